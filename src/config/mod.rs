//! `baler.toml` configuration.
//!
//! All sections are optional; a missing file yields the defaults. Unknown
//! keys are logged and ignored rather than rejected, so configs can carry
//! keys for newer versions.
//!
//! ```toml
//! [js]
//! mangle = true
//! compress = true
//! comments = false
//!
//! [css]
//! minify = true
//!
//! [render]
//! command = ["sass", "--stdin"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::log;

/// Top-level build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub js: JsConfig,
    pub css: CssConfig,
    pub render: RenderConfig,
}

/// `[js]` — script minifier options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    /// Mangle identifiers.
    pub mangle: bool,
    /// Apply the compressor.
    pub compress: bool,
    /// Keep comments in the output.
    pub comments: bool,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            mangle: true,
            compress: true,
            comments: false,
        }
    }
}

/// `[css]` — stylesheet minifier options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Minify compiled CSS bundles. Off by default; rendered output is
    /// deployable either way.
    pub minify: bool,
}

/// `[render]` — external stylesheet preprocessor invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Command that reads preprocessor text on stdin and writes CSS to
    /// stdout.
    pub command: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: vec!["sass".to_string(), "--stdin".to_string()],
        }
    }
}

/// Load configuration from `path`.
///
/// A missing file is not an error; it yields [`BuildConfig::default`].
pub fn load(path: &Path) -> Result<BuildConfig> {
    if !path.exists() {
        return Ok(BuildConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config `{}`", path.display()))?;

    let mut unknown = Vec::new();
    let config: BuildConfig =
        serde_ignored::deserialize(toml::Deserializer::new(&raw), |key| {
            unknown.push(key.to_string());
        })
        .with_context(|| format!("failed to parse config `{}`", path.display()))?;

    for key in unknown {
        log!("config"; "ignoring unknown key `{key}`");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert!(config.js.mangle);
        assert!(config.js.compress);
        assert!(!config.js.comments);
        assert!(!config.css.minify);
        assert_eq!(config.render.command, ["sass", "--stdin"]);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("baler.toml")).unwrap();
        assert!(config.js.mangle);
    }

    #[test]
    fn test_load_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baler.toml");
        fs::write(&path, "[css]\nminify = true\n\n[js]\nmangle = false\n").unwrap();

        let config = load(&path).unwrap();
        assert!(config.css.minify);
        assert!(!config.js.mangle);
        // Untouched sections keep their defaults.
        assert!(config.js.compress);
        assert_eq!(config.render.command, ["sass", "--stdin"]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baler.toml");
        fs::write(&path, "[js]\nmangle = true\nfuture_option = 3\n").unwrap();
        assert!(load(&path).is_ok());
    }

    #[test]
    fn test_invalid_toml_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baler.toml");
        fs::write(&path, "[js\nmangle =").unwrap();
        assert!(load(&path).is_err());
    }
}
