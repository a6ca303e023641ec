//! Asset records and the ordered asset collection.
//!
//! The collection is a single `IndexMap` keyed by asset key. Iteration order
//! is insertion order, which fixes manifest line order, bundle grouping
//! order, and the "first file in group" identity rule deterministically.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::kind::AssetKind;
use super::manifest::ManifestFile;

/// The shared asset collection for one pipeline run.
///
/// Created by an external discovery step, mutated in place through the
/// pipeline phases, handed back to the caller when all stages complete.
pub type AssetMap = IndexMap<String, Asset>;

/// A single source or derived asset.
///
/// Source entries are produced by discovery and carry provenance fields
/// (`path`, `commit`, `repo`/`base_path`/`asset_path`). Derived entries are
/// produced by the compile stages and carry `mime_type`, `hash` and
/// `extension` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Grouping tag: which deployable bundle this asset combines into.
    pub bundle_key: String,
    pub service_name: String,
    pub build_number: String,
    /// Deployment/version label distinguishing otherwise-identical bundles.
    pub tag: String,
    #[serde(default)]
    pub path: String,
    pub content: String,
    /// Source revision identifier from discovery.
    #[serde(default)]
    pub commit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Content-derived hash for cache-busted filenames. Style entries carry
    /// `<hash>.<buildNumber>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Already-minified content that later stages must not re-minify.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_minified_fragment: bool,
    /// Constituent file records, present on manifest entries only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ManifestFile>,
}

impl Asset {
    /// Build a derived (compiler-produced) entry.
    ///
    /// Derived entries have no source path or commit; their bundle key is
    /// the tag they were bundled under.
    pub fn derived(
        kind: AssetKind,
        service_name: &str,
        build_number: &str,
        tag: &str,
        content: String,
        mime_type: &str,
        extension: &str,
    ) -> Self {
        Self {
            kind,
            bundle_key: tag.to_string(),
            service_name: service_name.to_string(),
            build_number: build_number.to_string(),
            tag: tag.to_string(),
            path: String::new(),
            content,
            commit: String::new(),
            repo: None,
            base_path: None,
            asset_path: None,
            mime_type: Some(mime_type.to_string()),
            hash: None,
            extension: Some(extension.to_string()),
            is_minified_fragment: false,
            files: Vec::new(),
        }
    }

    /// Relative source path reconstructed from discovery fields.
    ///
    /// Joins `repo`, `basePath` and `assetPath`, skipping absent segments.
    pub fn relative_path(&self) -> String {
        [
            self.repo.as_deref(),
            self.base_path.as_deref(),
            self.asset_path.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
    }
}

/// Test fixture: a discovery-shaped source asset.
///
/// `name` doubles as the asset file name; the extension on `name` is what
/// the style stage partitions on.
#[cfg(test)]
pub(crate) fn fixture(kind: AssetKind, bundle_key: &str, name: &str, content: &str) -> Asset {
    Asset {
        kind,
        bundle_key: bundle_key.to_string(),
        service_name: "svc".to_string(),
        build_number: "7".to_string(),
        tag: "v1".to_string(),
        path: format!("/checkout/repo/public/{name}"),
        content: content.to_string(),
        commit: "abc123".to_string(),
        repo: Some("repo".to_string()),
        base_path: Some("public".to_string()),
        asset_path: Some(name.to_string()),
        mime_type: None,
        hash: None,
        extension: None,
        is_minified_fragment: false,
        files: Vec::new(),
    }
}
