use thiserror::Error;

/// Dough masses rejected by the validator. Carries every violation found,
/// not just the first.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid recipe: {}", .errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl ValidationError {
    pub fn new(errors: Vec<String>) -> Self {
        ValidationError { errors }
    }
}
