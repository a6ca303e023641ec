//! Command-backed stylesheet renderer.

use super::{RenderError, StyleRenderer};
use crate::utils::exec::Cmd;

/// Renders preprocessor text by piping it through an external command
/// (e.g. `sass --stdin`) and reading CSS back from stdout.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: Vec<String>,
}

impl CommandRenderer {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl StyleRenderer for CommandRenderer {
    fn render(&self, sheet: &str) -> Result<String, RenderError> {
        // Nothing to render; plain-css bundles never spawn a process.
        if sheet.is_empty() {
            return Ok(String::new());
        }
        if self.command.is_empty() {
            return Err(RenderError::Failed(
                "no [render] command configured".to_string(),
            ));
        }

        let output = Cmd::from_slice(&self.command)
            .stdin(sheet)
            .run()
            .map_err(|err| RenderError::Failed(format!("{err:#}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Failed(stderr.trim().to_string()));
        }

        let css = String::from_utf8_lossy(&output.stdout).into_owned();
        if css.trim().is_empty() {
            return Err(RenderError::NoOutput);
        }
        Ok(css)
    }
}
