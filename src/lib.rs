pub mod analysis;
pub mod backtest;
pub mod error;
pub mod returns;
pub mod seasonality;
pub mod signal;
pub mod types;

pub use error::SeasonalError;
pub use types::*;

/// Standard result type for all seasonal-core operations
pub type SeasonalResult<T> = Result<T, SeasonalError>;
