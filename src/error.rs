use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("bad expression: '{0}'")]
    BadExpression(String),
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;

impl CalcError {
    pub(crate) fn bad_expression(expression: &str) -> Self {
        CalcError::BadExpression(expression.to_string())
    }
}
