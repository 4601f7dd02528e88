use serde::{Deserialize, Serialize};
use std::{error::Error, fmt::Display};

pub type GuardResult<T> = Result<T, GuardError>;

/// Error raised while reading [crate::config::GuardConfig]. Evaluating a guard never fails.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GuardError(String);

impl Display for GuardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for GuardError {}

impl From<config::ConfigError> for GuardError {
    fn from(value: config::ConfigError) -> Self {
        Self(value.to_string())
    }
}
