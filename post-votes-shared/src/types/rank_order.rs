use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordering of a ranked post listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Newest first.
    #[default]
    Time,
    /// Highest score first.
    Score,
}

impl FromStr for RankOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "time" => Ok(RankOrder::Time),
            "score" => Ok(RankOrder::Score),
            other => Err(format!("unknown rank order: {other}")),
        }
    }
}
