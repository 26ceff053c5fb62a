use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Global operating profile selected at startup.
///
/// Determines which fetch collaborator the poller runs and which dashboard
/// is served at `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Issue-tracker velocity board.
    Planning,
    /// Inference-host liveness and model inventory.
    Active,
    /// Hierarchical experiment lifecycle view.
    Experiment,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Planning => "planning",
            Mode::Active => "active",
            Mode::Experiment => "experiment",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Mode::Planning),
            "active" => Ok(Mode::Active),
            "experiment" => Ok(Mode::Experiment),
            other => Err(format!(
                "unknown mode '{}' (expected planning, active, or experiment)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for s in ["planning", "active", "experiment"] {
            let mode: Mode = s.parse().unwrap();
            assert_eq!(mode.to_string(), s);
        }
    }

    #[test]
    fn test_mode_rejects_unknown() {
        assert!("tower".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Mode::Experiment).unwrap(),
            "\"experiment\""
        );
    }
}
