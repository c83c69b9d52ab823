use thiserror::Error;

pub type FwResult<T> = Result<T, FwError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FwError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
