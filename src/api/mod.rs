//! API Module
//!
//! HTTP boundary of the ledger: cached reads, normalized on the way out.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
