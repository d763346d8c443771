use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::{NormalError, uniform::Error as UniformError};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, SimErr>;

/// The simulation's error type.
///
/// Numeric overflow is not an error: infinities and NaNs produced while
/// propagating are returned as regular statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum SimErr {
    InvalidDimension { got: i64 },
    InvalidLayerCount { got: i64 },
    InvalidScale(String),
    InvalidTrialCount,
    Config(String),
}

impl From<NormalError> for SimErr {
    fn from(value: NormalError) -> Self {
        Self::InvalidScale(value.to_string())
    }
}

impl From<UniformError> for SimErr {
    fn from(value: UniformError) -> Self {
        Self::InvalidScale(value.to_string())
    }
}

impl Display for SimErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SimErr::InvalidDimension { got } => {
                format!("The input dimension must be positive, got {got}")
            }
            SimErr::InvalidLayerCount { got } => {
                format!("The amount of layers can't be negative, got {got}")
            }
            SimErr::InvalidScale(msg) => {
                format!("The weight distribution rejected the scale: {msg}")
            }
            SimErr::InvalidTrialCount => "At least one trial must be requested".to_string(),
            SimErr::Config(msg) => format!("invalid experiment config: {msg}"),
        };

        write!(f, "{s}")
    }
}

impl Error for SimErr {}
