pub mod error;

pub use error::{HarvestError, Result};
