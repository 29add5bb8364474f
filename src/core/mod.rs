pub mod error;
pub mod money;
pub mod state;

pub use error::{AppError, Result};
pub use state::RecordState;
