//! Provenance manifests.
//!
//! One manifest per distinct (service, build, tag, kind) combination seen in
//! the pristine collection, listing every constituent file with its content
//! hash and last commit. Manifests are computed strictly before any compile
//! stage deletes or replaces a source asset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::key::{build_key, content_hash};
use super::kind::AssetKind;
use super::store::{Asset, AssetMap};
use crate::utils::mime;

/// One constituent-file record inside a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFile {
    /// Source-record key: `service/build/src/<relativePath>`.
    pub key: String,
    pub relative_path: String,
    pub content: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
}

/// Derive manifest assets from the pristine collection.
///
/// Scans in collection order, so manifest line order and file order are
/// reproducible. Returns `(key, asset)` pairs to insert; the input is not
/// mutated.
pub fn build_manifests(assets: &AssetMap) -> Vec<(String, Asset)> {
    let mut manifests: IndexMap<String, Asset> = IndexMap::new();

    for asset in assets.values() {
        let manifest_key = build_key(
            &asset.service_name,
            &asset.build_number,
            &asset.tag,
            asset.kind.as_str(),
            "manifest",
            "txt",
        );

        let manifest = manifests
            .entry(manifest_key)
            .or_insert_with(|| empty_manifest(asset));

        let relative_path = asset.relative_path();
        manifest.content.push_str(&format!(
            "{relative_path}, Hash: {}, Last commit: {}\n",
            content_hash(&asset.content),
            asset.commit,
        ));
        manifest.files.push(ManifestFile {
            key: build_key(
                &asset.service_name,
                &asset.build_number,
                &relative_path,
                "",
                "src",
                "",
            ),
            relative_path,
            content: asset.content.clone(),
            path: asset.path.clone(),
            kind: asset.kind,
        });
    }

    manifests.into_iter().collect()
}

/// Fresh manifest entry for the identity of `asset`.
///
/// Manifests enter the collection as plain-text "other" assets flagged as
/// minified fragments so later stages never re-minify them.
fn empty_manifest(asset: &Asset) -> Asset {
    Asset {
        kind: AssetKind::Other,
        bundle_key: asset.tag.clone(),
        service_name: asset.service_name.clone(),
        build_number: asset.build_number.clone(),
        tag: asset.tag.clone(),
        path: String::new(),
        content: String::new(),
        commit: String::new(),
        repo: None,
        base_path: None,
        asset_path: None,
        mime_type: Some(mime::PLAIN.to_string()),
        hash: None,
        extension: Some(".manifest".to_string()),
        is_minified_fragment: true,
        files: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::store::fixture;

    fn collection() -> AssetMap {
        let mut assets = AssetMap::default();
        assets.insert("a".into(), fixture(AssetKind::Script, "main", "a.js", "var a=1;"));
        assets.insert("b".into(), fixture(AssetKind::Script, "main", "b.js", "var b=2;"));
        assets.insert("c".into(), fixture(AssetKind::Style, "main", "c.css", "body {}"));
        assets
    }

    #[test]
    fn test_one_manifest_per_identity() {
        let manifests = build_manifests(&collection());
        // Two kinds under the same (svc, 7, v1) identity.
        assert_eq!(manifests.len(), 2);
        let keys: Vec<_> = manifests.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["svc/7/manifest/v1.script.txt", "svc/7/manifest/v1.style.txt"]);
    }

    #[test]
    fn test_file_list_cardinality_matches_sources() {
        let manifests = build_manifests(&collection());
        let script = &manifests[0].1;
        assert_eq!(script.files.len(), 2);
        let style = &manifests[1].1;
        assert_eq!(style.files.len(), 1);
    }

    #[test]
    fn test_content_lines() {
        let manifests = build_manifests(&collection());
        let script = &manifests[0].1;
        let expected_first = format!(
            "repo/public/a.js, Hash: {}, Last commit: abc123\n",
            content_hash("var a=1;"),
        );
        assert!(script.content.starts_with(&expected_first));
        assert_eq!(script.content.lines().count(), 2);
    }

    #[test]
    fn test_file_records() {
        let manifests = build_manifests(&collection());
        let file = &manifests[0].1.files[0];
        assert_eq!(file.key, "svc/7/src/repo/public/a.js");
        assert_eq!(file.relative_path, "repo/public/a.js");
        assert_eq!(file.content, "var a=1;");
        assert_eq!(file.kind, AssetKind::Script);
    }

    #[test]
    fn test_manifest_entry_shape() {
        let manifests = build_manifests(&collection());
        let manifest = &manifests[0].1;
        assert_eq!(manifest.kind, AssetKind::Other);
        assert_eq!(manifest.mime_type.as_deref(), Some(mime::PLAIN));
        assert_eq!(manifest.extension.as_deref(), Some(".manifest"));
        assert!(manifest.is_minified_fragment);
    }

    #[test]
    fn test_input_not_mutated() {
        let assets = collection();
        let len = assets.len();
        build_manifests(&assets);
        assert_eq!(assets.len(), len);
    }
}
