pub mod config;
pub mod errors;
pub mod lambda_error;
pub mod telemetry;
pub mod tracing;

pub use config::*;
pub use errors::*;
pub use lambda_error::*;
pub use tracing::*;
