pub mod calendar;
pub mod error;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "charts")]
pub mod charts;

pub use error::TilgungsplanError;
pub use types::*;

/// Standard result type for all Tilgungsplan operations
pub type TilgungsplanResult<T> = Result<T, TilgungsplanError>;
