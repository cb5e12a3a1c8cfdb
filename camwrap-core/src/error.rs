use std::borrow::Cow;

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),
    #[error("Out of range: {0}")]
    OutOfRange(Cow<'static, str>),
    #[error("Out of memory: {0}")]
    OutOfMemory(Cow<'static, str>),
    #[error("Module unavailable: {0}")]
    ModuleUnavailable(Cow<'static, str>),
    #[error("Not found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Vendor error: {0}")]
    Vendor(i32),
}

impl Error {
    /// Vendor error codes cross the HAL boundary verbatim and are never
    /// reinterpreted by the wrapper.
    pub fn is_vendor(&self) -> bool {
        matches!(self, Error::Vendor(_))
    }
}

#[macro_export]
macro_rules! invalid_arg_error {
    ($param:literal) => {
        $crate::error::Error::InvalidArgument($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::InvalidArgument(format!("{:?}", $param).into())
    };
}

#[macro_export]
macro_rules! out_of_range_error {
    ($param:literal) => {
        $crate::error::Error::OutOfRange($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::OutOfRange(format!("{:?}", $param).into())
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($param:literal) => {
        $crate::error::Error::NotFound($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::NotFound(format!("{:?}", $param).into())
    };
}

#[macro_export]
macro_rules! module_unavailable_error {
    ($param:literal) => {
        $crate::error::Error::ModuleUnavailable($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::ModuleUnavailable(format!("{:?}", $param).into())
    };
}
