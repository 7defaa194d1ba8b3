pub mod enums;
pub mod diagnosis;

pub use enums::*;
pub use diagnosis::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
