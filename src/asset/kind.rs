//! Asset kind definitions.

use serde::{Deserialize, Serialize};

/// Kind of discovered asset.
///
/// Determines which compile stage consumes the asset. Every asset carries
/// exactly one kind for the lifetime of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// JavaScript source, bundled and minified by the script stage.
    Script,
    /// Stylesheet or preprocessor source, rendered by the style stage.
    Style,
    /// Anything else. Passed through untouched.
    Other,
}

impl AssetKind {
    /// Lowercase name, used in manifest identity keys.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Script => "script",
            AssetKind::Style => "style",
            AssetKind::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde_names() {
        assert_eq!(serde_json::to_string(&AssetKind::Script).unwrap(), "\"script\"");
        assert_eq!(
            serde_json::from_str::<AssetKind>("\"style\"").unwrap(),
            AssetKind::Style
        );
    }

    #[test]
    fn test_as_str() {
        assert_eq!(AssetKind::Other.as_str(), "other");
    }
}
