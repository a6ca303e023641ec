//! Script bundle compilation.
//!
//! Bundles are compiled sequentially; minification is CPU-bound and the
//! minifier is invoked once per bundle. A bundle whose source fails to
//! minify degrades to empty output instead of failing the run.

use owo_colors::OwoColorize;

use super::StageDiff;
use crate::asset::key::{build_key, content_hash};
use crate::asset::minify::{MinifiedJs, minify_js};
use crate::asset::{Asset, AssetKind, AssetMap, Groups};
use crate::config::JsConfig;
use crate::log;
use crate::utils::mime;

/// Compile every script bundle group.
///
/// For each group: concatenate member contents in group order, minify,
/// consume the sources, and emit a source-map asset plus a content-hashed
/// minified asset. Bundle identity (service, build, tag) comes from the
/// first file in group order.
pub fn compile(assets: &AssetMap, groups: &Groups, config: &JsConfig) -> StageDiff {
    let mut diff = StageDiff::default();

    for (bundle_key, members) in groups {
        if members.is_empty() {
            continue;
        }
        let Some(first) = members.keys().find_map(|key| assets.get(key)) else {
            continue;
        };
        let service_name = first.service_name.clone();
        let build_number = first.build_number.clone();
        let tag = first.tag.clone();

        log!("js"; "Compiling {} {} JS assets ...", members.len(), bundle_key.bright_blue());

        let source = members
            .keys()
            .filter_map(|key| assets.get(key))
            .map(|asset| asset.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let minified = match minify_js(&source, &format!("{tag}.js.map"), config) {
            Some(out) => out,
            None => {
                log!("error"; "There was an error minifying files in {}, emitting empty code", bundle_key.bright_blue());
                MinifiedJs {
                    code: String::new(),
                    map: None,
                }
            }
        };

        diff.removed.extend(members.keys().cloned());

        let map_key = build_key(&service_name, &build_number, &tag, "js", "js", "map");
        let map_asset = Asset::derived(
            AssetKind::Script,
            &service_name,
            &build_number,
            &tag,
            minified.map.unwrap_or_default(),
            mime::JAVASCRIPT,
            ".map",
        );
        diff.added.push((map_key, map_asset));

        let hash = content_hash(&minified.code);
        let min_key = build_key(&service_name, &build_number, &tag, &hash, "js", "js");
        let mut min_asset = Asset::derived(
            AssetKind::Script,
            &service_name,
            &build_number,
            &tag,
            minified.code,
            mime::JAVASCRIPT,
            ".js",
        );
        min_asset.hash = Some(hash);
        diff.added.push((min_key, min_asset));
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{classify, fixture};

    fn script_map(entries: &[(&str, &str, &str)]) -> AssetMap {
        let mut assets = AssetMap::default();
        for (key, bundle, content) in entries {
            assets.insert(key.to_string(), fixture(AssetKind::Script, bundle, &format!("{key}.js"), content));
        }
        assets
    }

    #[test]
    fn test_bundle_emits_map_and_minified_assets() {
        let assets = script_map(&[("a", "main", "var a=1;"), ("b", "main", "var b=2;")]);
        let groups = classify(&assets).scripts;

        let diff = compile(&assets, &groups, &JsConfig::default());

        assert_eq!(diff.removed, ["a", "b"]);
        assert_eq!(diff.added.len(), 2);

        let (map_key, map_asset) = &diff.added[0];
        assert_eq!(map_key, "svc/7/js/v1.js.map");
        assert_eq!(map_asset.mime_type.as_deref(), Some(mime::JAVASCRIPT));
        assert!(!map_asset.content.is_empty());

        let (min_key, min_asset) = &diff.added[1];
        assert!(!min_asset.content.is_empty());
        let hash = content_hash(&min_asset.content);
        assert_eq!(min_key, &build_key("svc", "7", "v1", &hash, "js", "js"));
        assert_eq!(min_asset.hash.as_deref(), Some(hash.as_str()));
        assert_eq!(min_asset.mime_type.as_deref(), Some(mime::JAVASCRIPT));
    }

    #[test]
    fn test_minify_failure_degrades_to_empty_code() {
        let assets = script_map(&[("bad", "broken", "var a = ;")]);
        let groups = classify(&assets).scripts;

        let diff = compile(&assets, &groups, &JsConfig::default());

        // Sources are still consumed and both derived entries still emitted.
        assert_eq!(diff.removed, ["bad"]);
        assert_eq!(diff.added.len(), 2);
        let (_, min_asset) = &diff.added[1];
        assert!(min_asset.content.is_empty());
    }

    #[test]
    fn test_failed_bundle_does_not_affect_siblings() {
        let mut assets = script_map(&[("bad", "broken", "var a = ;"), ("ok", "main", "var b=2;")]);
        assets.get_mut("bad").unwrap().tag = "v1-broken".to_string();
        let groups = classify(&assets).scripts;

        let diff = compile(&assets, &groups, &JsConfig::default());

        assert_eq!(diff.removed.len(), 2);
        assert_eq!(diff.added.len(), 4);

        let minified: Vec<_> = diff
            .added
            .iter()
            .filter(|(_, asset)| asset.extension.as_deref() == Some(".js"))
            .collect();
        assert_eq!(minified.len(), 2);
        assert!(minified.iter().any(|(_, asset)| asset.content.is_empty()));
        assert!(minified.iter().any(|(_, asset)| !asset.content.is_empty()));
    }
}
