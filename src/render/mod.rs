//! External stylesheet preprocessor boundary.
//!
//! The pipeline never renders preprocessor text itself; it hands the
//! accumulated sheet to a [`StyleRenderer`] and consumes whatever comes
//! back. The production implementation shells out to a configured command
//! ([`CommandRenderer`]); tests substitute in-process fakes.

mod command;

pub use command::CommandRenderer;

use thiserror::Error;

/// Renders accumulated preprocessor text (e.g. SCSS) into plain CSS.
///
/// Implementations are called once per bundle, concurrently across bundles,
/// so they must be `Sync`.
pub trait StyleRenderer: Sync {
    fn render(&self, sheet: &str) -> Result<String, RenderError>;
}

/// Why a render call produced no usable CSS.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer ran but produced nothing. Recoverable: the bundle is
    /// skipped, siblings are unaffected.
    #[error("renderer produced no output")]
    NoOutput,

    /// The renderer itself failed. Fatal to the style stage.
    #[error("{0}")]
    Failed(String),
}
