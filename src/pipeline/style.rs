//! Style bundle compilation.
//!
//! Sources are accumulated and consumed serially by the collection owner;
//! the render calls fan out across bundles on the rayon pool, whose size
//! bounds the number of in-flight external renders. Failures stay scoped
//! to their bundle except for genuine render errors, which are fatal to
//! the stage.

use std::path::Path;

use owo_colors::OwoColorize;
use rayon::prelude::*;
use thiserror::Error;

use super::StageDiff;
use crate::asset::key::{build_key, content_hash};
use crate::asset::minify::minify_css;
use crate::asset::{Asset, AssetKind, AssetMap, Groups};
use crate::config::CssConfig;
use crate::log;
use crate::render::{RenderError, StyleRenderer};
use crate::utils::mime;

/// Style-stage failure for one bundle.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Recoverable skip: the bundle rendered to nothing. No derived asset
    /// is emitted; sibling bundles are unaffected.
    #[error("No css for tag {tag}")]
    NoContent { tag: String },

    /// Fatal: the renderer failed. Propagated to the orchestrator, which
    /// halts the stages that have not yet run.
    #[error("failed to render `{tag}` styles: {source}")]
    Render {
        tag: String,
        #[source]
        source: RenderError,
    },
}

/// One bundle's accumulated inputs, ready to render.
struct CssBundle {
    service_name: String,
    build_number: String,
    tag: String,
    /// Plain stylesheet text, concatenated directly.
    css: String,
    /// Preprocessor text, rendered before concatenation.
    scss: String,
    count: usize,
}

/// Compile every style bundle group.
///
/// Returns the stage diff plus the first fatal error, if any. Bundles that
/// completed before a sibling failed keep their place in the diff.
pub fn compile(
    assets: &AssetMap,
    groups: &Groups,
    config: &CssConfig,
    renderer: &dyn StyleRenderer,
) -> (StageDiff, Option<StyleError>) {
    let mut diff = StageDiff::default();
    let mut bundles = Vec::new();

    for members in groups.values() {
        let mut bundle: Option<CssBundle> = None;
        for (key, path) in members {
            let Some(asset) = assets.get(key) else {
                continue;
            };
            let accumulated = bundle.get_or_insert_with(|| CssBundle {
                service_name: asset.service_name.clone(),
                build_number: asset.build_number.clone(),
                tag: asset.tag.clone(),
                css: String::new(),
                scss: String::new(),
                count: 0,
            });
            match Path::new(path).extension().and_then(|ext| ext.to_str()) {
                Some("css") => accumulated.css.push_str(&asset.content),
                _ => accumulated.scss.push_str(&asset.content),
            }
            accumulated.count += 1;
            diff.removed.push(key.clone());
        }
        if let Some(bundle) = bundle {
            bundles.push(bundle);
        }
    }

    let results: Vec<Result<(String, Asset), StyleError>> = bundles
        .par_iter()
        .map(|bundle| compile_bundle(bundle, config, renderer))
        .collect();

    let mut fatal = None;
    for result in results {
        match result {
            Ok((key, asset)) => diff.added.push((key, asset)),
            Err(skip @ StyleError::NoContent { .. }) => {
                log!("css"; "No CSS assets: {skip}");
            }
            Err(err) => {
                log!("error"; "{err}");
                if fatal.is_none() {
                    fatal = Some(err);
                }
            }
        }
    }

    (diff, fatal)
}

/// Render, optionally minify, and key a single bundle.
fn compile_bundle(
    bundle: &CssBundle,
    config: &CssConfig,
    renderer: &dyn StyleRenderer,
) -> Result<(String, Asset), StyleError> {
    log!("css"; "Compiling {} {} CSS assets ...", bundle.count, bundle.tag.bright_blue());

    let rendered = match renderer.render(&bundle.scss) {
        Ok(css) => css,
        Err(RenderError::NoOutput) => {
            return Err(StyleError::NoContent {
                tag: bundle.tag.clone(),
            });
        }
        Err(err) => {
            return Err(StyleError::Render {
                tag: bundle.tag.clone(),
                source: err,
            });
        }
    };

    let mut content = format!("{}{}", bundle.css, rendered);
    if config.minify && !content.is_empty() {
        match minify_css(&content) {
            Some(minified) => content = minified,
            None => {
                log!("css"; "minify failed for {}, keeping unminified output", bundle.tag)
            }
        }
    }
    if content.is_empty() {
        return Err(StyleError::NoContent {
            tag: bundle.tag.clone(),
        });
    }

    let hash = content_hash(&content);
    let key = build_key(
        &bundle.service_name,
        &bundle.build_number,
        &bundle.tag,
        &hash,
        "css",
        "css",
    );
    let mut asset = Asset::derived(
        AssetKind::Style,
        &bundle.service_name,
        &bundle.build_number,
        &bundle.tag,
        content,
        mime::CSS,
        ".css",
    );
    asset.hash = Some(format!("{hash}.{}", bundle.build_number));
    Ok((key, asset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{classify, fixture};

    /// Returns the sheet back unchanged, standing in for a real render.
    struct EchoRenderer;
    impl StyleRenderer for EchoRenderer {
        fn render(&self, sheet: &str) -> Result<String, RenderError> {
            Ok(sheet.to_string())
        }
    }

    struct SilentRenderer;
    impl StyleRenderer for SilentRenderer {
        fn render(&self, _sheet: &str) -> Result<String, RenderError> {
            Err(RenderError::NoOutput)
        }
    }

    /// Fails on sheets containing `BAD`, echoes everything else.
    struct MarkerFailRenderer;
    impl StyleRenderer for MarkerFailRenderer {
        fn render(&self, sheet: &str) -> Result<String, RenderError> {
            if sheet.contains("BAD") {
                Err(RenderError::Failed("unparsable sheet".to_string()))
            } else {
                Ok(sheet.to_string())
            }
        }
    }

    fn style_map(entries: &[(&str, &str, &str, &str)]) -> AssetMap {
        let mut assets = AssetMap::default();
        for (key, bundle, name, content) in entries {
            assets.insert(key.to_string(), fixture(AssetKind::Style, bundle, name, content));
        }
        assets
    }

    #[test]
    fn test_plain_and_preprocessor_partition() {
        let assets = style_map(&[
            ("plain", "main", "base.css", "body { color: red; }\n"),
            ("pre", "main", "theme.scss", ".a { .b { color: blue; } }\n"),
        ]);
        let groups = classify(&assets).styles;

        let (diff, fatal) = compile(&assets, &groups, &CssConfig::default(), &EchoRenderer);

        assert!(fatal.is_none());
        assert_eq!(diff.removed, ["plain", "pre"]);
        assert_eq!(diff.added.len(), 1);

        let (key, asset) = &diff.added[0];
        // Plain css first, rendered output appended.
        assert!(asset.content.starts_with("body { color: red; }"));
        assert!(asset.content.contains(".b { color: blue; }"));

        let hash = content_hash(&asset.content);
        assert_eq!(key, &build_key("svc", "7", "v1", &hash, "css", "css"));
        assert_eq!(asset.hash.as_deref(), Some(format!("{hash}.7").as_str()));
        assert_eq!(asset.mime_type.as_deref(), Some(mime::CSS));
    }

    #[test]
    fn test_no_output_bundle_is_skipped() {
        let assets = style_map(&[("pre", "main", "theme.scss", ".broken {")]);
        let groups = classify(&assets).styles;

        let (diff, fatal) = compile(&assets, &groups, &CssConfig::default(), &SilentRenderer);

        assert!(fatal.is_none());
        // Sources consumed, nothing emitted.
        assert_eq!(diff.removed, ["pre"]);
        assert!(diff.added.is_empty());
    }

    #[test]
    fn test_empty_content_is_skipped() {
        let assets = style_map(&[("empty", "main", "empty.css", "")]);
        let groups = classify(&assets).styles;

        let (diff, fatal) = compile(&assets, &groups, &CssConfig::default(), &EchoRenderer);

        assert!(fatal.is_none());
        assert!(diff.added.is_empty());
    }

    #[test]
    fn test_fatal_render_error_keeps_sibling_results() {
        let mut assets = style_map(&[
            ("bad", "broken", "broken.scss", "BAD {"),
            ("ok", "main", "ok.css", "body { color: red; }"),
        ]);
        assets.get_mut("bad").unwrap().tag = "v1-broken".to_string();
        let groups = classify(&assets).styles;

        let (diff, fatal) = compile(&assets, &groups, &CssConfig::default(), &MarkerFailRenderer);

        let fatal = fatal.expect("render failure should escalate");
        assert!(matches!(fatal, StyleError::Render { .. }));
        // The healthy sibling still produced its bundle.
        assert_eq!(diff.added.len(), 1);
        assert!(diff.added[0].1.content.contains("red"));
        // Both bundles' sources were consumed.
        assert_eq!(diff.removed.len(), 2);
    }

    #[test]
    fn test_css_minify_flag() {
        let assets = style_map(&[("plain", "main", "base.css", "body {  color:  red;  }")]);
        let groups = classify(&assets).styles;
        let config = CssConfig { minify: true };

        let (diff, fatal) = compile(&assets, &groups, &config, &EchoRenderer);

        assert!(fatal.is_none());
        let (_, asset) = &diff.added[0];
        assert!(asset.content.len() < "body {  color:  red;  }".len());
        assert!(asset.content.contains("red"));
    }
}
