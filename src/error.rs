use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown filter type {0:?}")]
    UnknownType(String),
    #[error("filter type index {0} is outside the catalog")]
    IndexOutOfRange(usize),
}
