//! `baler build` — run the pipeline over a discovered collection.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::asset::AssetMap;
use crate::config::BuildConfig;
use crate::log;
use crate::logger::ProgressLine;
use crate::pipeline::Pipeline;
use crate::render::CommandRenderer;

/// Load the collection, run every pipeline phase, and write the mutated
/// collection to `out`.
///
/// A fatal style error is returned *after* the collection-so-far has been
/// written, so sibling bundles stay deployable.
pub fn run(assets_path: &Path, out: &Path, config: &BuildConfig) -> Result<()> {
    let raw = fs::read_to_string(assets_path)
        .with_context(|| format!("failed to read asset collection `{}`", assets_path.display()))?;
    let assets: AssetMap = serde_json::from_str(&raw)
        .with_context(|| format!("invalid asset collection `{}`", assets_path.display()))?;

    log!("build"; "bundling {} discovered assets", assets.len());

    let renderer = CommandRenderer::new(config.render.command.clone());
    let outcome = Pipeline::new(config, &renderer).run(assets);

    write_assets(&outcome.assets, out)?;
    log!("build"; "wrote {} assets to {}", outcome.assets.len(), out.display());

    match outcome.error {
        Some(err) => Err(err).context("style compilation failed"),
        None => Ok(()),
    }
}

/// Write every asset under its key path below `out`.
fn write_assets(assets: &AssetMap, out: &Path) -> Result<()> {
    let progress = ProgressLine::new(&[("assets", assets.len())]);

    for (key, asset) in assets {
        let path = out.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, asset.content.as_bytes())
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        progress.inc("assets");
    }

    progress.finish();
    Ok(())
}
