//! Domain values and HTTP DTOs
//!
//! The domain values are the inputs the normalizer is exercised with; the
//! request and response types shape the ledger API.

pub mod assets;
pub mod records;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use assets::{Asset, Location, TradeType};
pub use records::{AssetBalance, Balance, BalanceCategory, LocationData, Trade, VersionInfo};
pub use requests::{QueryParams, TradeRequest, TtlRequest};
pub use responses::{ClearResponse, HealthResponse, StatsResponse, TradeResponse, TtlResponse};
