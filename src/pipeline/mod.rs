//! The bundling pipeline: phase machine and stage sequencing.
//!
//! ```text
//! Start → ManifestBuilt → Classified → ScriptsCompiled
//!       → StylesCompiled → OthersCompiled → Done
//!                        ↘ Failed (fatal style error)
//! ```
//!
//! Stages never touch the shared collection directly. Each one receives an
//! immutable snapshot and returns a [`StageDiff`]; the run loop owns every
//! mutation, so each source asset is consumed at most once even though the
//! style stage renders bundles concurrently.

pub mod script;
pub mod style;

use rustc_hash::FxHashSet;

use crate::asset::manifest::build_manifests;
use crate::asset::{Asset, AssetMap, Groups, classify};
use crate::config::BuildConfig;
use crate::render::StyleRenderer;

pub use style::StyleError;

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    ManifestBuilt,
    Classified,
    ScriptsCompiled,
    StylesCompiled,
    OthersCompiled,
    Done,
    /// Terminal state reached only from a fatal style-compile error.
    Failed,
}

impl Phase {
    /// Successor in the normal (non-failed) sequence. Terminal states map
    /// to themselves.
    pub fn next(self) -> Phase {
        match self {
            Phase::Start => Phase::ManifestBuilt,
            Phase::ManifestBuilt => Phase::Classified,
            Phase::Classified => Phase::ScriptsCompiled,
            Phase::ScriptsCompiled => Phase::StylesCompiled,
            Phase::StylesCompiled => Phase::OthersCompiled,
            Phase::OthersCompiled => Phase::Done,
            Phase::Done => Phase::Done,
            Phase::Failed => Phase::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

/// Additions and removals one stage wants applied to the collection.
#[derive(Debug, Default)]
pub struct StageDiff {
    pub removed: Vec<String>,
    pub added: Vec<(String, Asset)>,
}

/// Result of a pipeline run.
///
/// `assets` is always the mutated collection, including everything sibling
/// bundles produced before a fatal error; `error` is set exactly when
/// `phase` is [`Phase::Failed`].
#[derive(Debug)]
pub struct PipelineOutcome {
    pub assets: AssetMap,
    pub phase: Phase,
    pub error: Option<StyleError>,
}

/// Sequences the compile stages over one asset collection.
pub struct Pipeline<'a> {
    config: &'a BuildConfig,
    renderer: &'a dyn StyleRenderer,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a BuildConfig, renderer: &'a dyn StyleRenderer) -> Self {
        Self { config, renderer }
    }

    /// Run all phases over `assets` and hand the collection back.
    ///
    /// Each stage fully completes, including its internal concurrency,
    /// before the next begins.
    pub fn run(&self, mut assets: AssetMap) -> PipelineOutcome {
        let mut consumed = FxHashSet::default();
        let mut phase = Phase::Start;

        // Manifests see the pristine snapshot, before any stage deletes or
        // replaces a source asset.
        let manifests = build_manifests(&assets);
        apply(
            &mut assets,
            StageDiff {
                removed: Vec::new(),
                added: manifests,
            },
            &mut consumed,
        );
        phase = phase.next();

        let classified = classify(&assets);
        phase = phase.next();

        let diff = script::compile(&assets, &classified.scripts, &self.config.js);
        apply(&mut assets, diff, &mut consumed);
        phase = phase.next();

        let (diff, fatal) =
            style::compile(&assets, &classified.styles, &self.config.css, self.renderer);
        // Bundles that completed before a sibling failed keep their results.
        apply(&mut assets, diff, &mut consumed);
        if let Some(error) = fatal {
            return PipelineOutcome {
                assets,
                phase: Phase::Failed,
                error: Some(error),
            };
        }
        phase = phase.next();

        let diff = compile_others(&classified.others);
        apply(&mut assets, diff, &mut consumed);
        phase = phase.next();

        phase = phase.next();
        debug_assert_eq!(phase, Phase::Done);
        PipelineOutcome {
            assets,
            phase,
            error: None,
        }
    }
}

/// Other-type assets: pass-through placeholder.
///
/// Nothing is transformed or consumed; entries stay in the collection
/// unchanged.
fn compile_others(_groups: &Groups) -> StageDiff {
    StageDiff::default()
}

/// Merge one stage's diff into the collection.
///
/// Removals apply before insertions so a derived entry may legally reuse a
/// source key. Each key is consumed at most once across the whole run.
fn apply(assets: &mut AssetMap, diff: StageDiff, consumed: &mut FxHashSet<String>) {
    for key in diff.removed {
        debug_assert!(consumed.insert(key.clone()), "asset `{key}` consumed twice");
        assets.shift_remove(&key);
    }
    for (key, asset) in diff.added {
        assets.insert(key, asset);
    }
}
