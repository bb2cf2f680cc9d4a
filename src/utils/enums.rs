use serde::{Deserialize, Serialize};

/// How softmax turns scores into a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftmaxKind {
    /// Subtracts the per-axis maximum before exponentiating
    Stable,
    /// Plain exp / sum, overflows for large scores
    Naive,
}

impl Default for SoftmaxKind {
    fn default() -> Self {
        Self::Stable
    }
}

impl std::str::FromStr for SoftmaxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "naive" => Ok(Self::Naive),
            other => Err(format!("unknown softmax kind '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_softmax_kind() {
        assert_eq!("naive".parse::<SoftmaxKind>(), Ok(SoftmaxKind::Naive));
        assert_eq!("Stable".parse::<SoftmaxKind>(), Ok(SoftmaxKind::Stable));
        assert!("fast".parse::<SoftmaxKind>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&SoftmaxKind::Naive).unwrap();
        assert_eq!(json, "\"naive\"");
        let kind: SoftmaxKind = serde_json::from_str("\"stable\"").unwrap();
        assert_eq!(kind, SoftmaxKind::Stable);
    }
}
