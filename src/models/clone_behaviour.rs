//! Clone behaviour policy

use serde::{Deserialize, Serialize};

/// How agents are produced from a cloud image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloneBehaviour {
    /// A new instance is cloned from the source for every agent
    FreshClone,
    /// The source is copied once and the copy is reused
    Copy,
    /// An existing instance is started and stopped
    StartStop,
}

impl std::fmt::Display for CloneBehaviour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloneBehaviour::FreshClone => write!(f, "FRESH_CLONE"),
            CloneBehaviour::Copy => write!(f, "COPY"),
            CloneBehaviour::StartStop => write!(f, "START_STOP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CloneBehaviour::FreshClone.to_string(), "FRESH_CLONE");
        assert_eq!(CloneBehaviour::Copy.to_string(), "COPY");
        assert_eq!(CloneBehaviour::StartStop.to_string(), "START_STOP");
    }

    #[test]
    fn test_serde_names_match_display() {
        for b in [CloneBehaviour::FreshClone, CloneBehaviour::Copy, CloneBehaviour::StartStop] {
            let json = serde_json::to_string(&b).unwrap();
            assert_eq!(json, format!("\"{}\"", b));
        }
    }
}
