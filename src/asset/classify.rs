//! Read-only classification of the asset collection.

use indexmap::IndexMap;

use super::kind::AssetKind;
use super::store::AssetMap;

/// `bundleKey -> asset key -> source path` grouping for one asset kind.
pub type Groups = IndexMap<String, IndexMap<String, String>>;

/// The collection partitioned by kind, grouped by bundle key.
///
/// Every asset lands in exactly one grouping, selected solely by `type`;
/// assets sharing a bundle key merge under one sub-map regardless of
/// originating source. Group and member order follow collection order.
#[derive(Debug, Default)]
pub struct Classified {
    pub scripts: Groups,
    pub styles: Groups,
    pub others: Groups,
}

/// Partition the collection into script, style and other groupings.
///
/// Classification never mutates or removes assets.
pub fn classify(assets: &AssetMap) -> Classified {
    let mut classified = Classified::default();
    for (key, asset) in assets {
        let groups = match asset.kind {
            AssetKind::Script => &mut classified.scripts,
            AssetKind::Style => &mut classified.styles,
            AssetKind::Other => &mut classified.others,
        };
        groups
            .entry(asset.bundle_key.clone())
            .or_default()
            .insert(key.clone(), asset.path.clone());
    }
    classified
}
