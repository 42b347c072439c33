mod environment;
mod error;

pub use environment::{Environment, StoreSettings};
pub use error::AppError;
