pub mod enums;
pub mod product;
pub mod profile;
pub mod report;

pub use enums::*;
pub use product::*;
pub use profile::*;
pub use report::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
