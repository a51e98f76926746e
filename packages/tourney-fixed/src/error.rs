use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MathError {
    #[error("Fixed-point overflow: {operation}")]
    Overflow { operation: &'static str },

    #[error("Division by zero")]
    DivideByZero {},

    #[error("{operation} is undefined for a non-positive input")]
    NonPositiveInput { operation: &'static str },
}

impl MathError {
    pub(crate) fn overflow(operation: &'static str) -> Self {
        MathError::Overflow { operation }
    }
}
