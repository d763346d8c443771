use std::{
    fmt::{self, Display},
    str::FromStr,
};

use super::InitStrategy;
use crate::SimErr;

impl FromStr for InitStrategy {
    type Err = SimErr;

    /// Parses `standard_normal`, `scaled_normal:<scale>`, `xavier` or `kaiming`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(scale) = s.strip_prefix("scaled_normal:") {
            let scale = scale
                .trim()
                .parse::<f32>()
                .map_err(|e| SimErr::Config(format!("invalid scale '{scale}': {e}")))?;

            return Ok(Self::ScaledNormal(scale));
        }

        match s {
            "standard_normal" => Ok(Self::StandardNormal),
            "xavier" => Ok(Self::Xavier),
            "kaiming" => Ok(Self::Kaiming),
            other => Err(SimErr::Config(format!("unknown init: {other}"))),
        }
    }
}

impl Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StandardNormal => f.write_str("standard_normal"),
            Self::ScaledNormal(scale) => write!(f, "scaled_normal:{scale}"),
            Self::Xavier => f.write_str("xavier"),
            Self::Kaiming => f.write_str("kaiming"),
        }
    }
}
