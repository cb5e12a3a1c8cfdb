pub mod error;
pub mod params;

pub use params::{keys, Parameters};

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;
