//! `baler hash` — print the content hash of a file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::asset::key::content_hash;

pub fn run(file: &Path) -> Result<()> {
    let content =
        fs::read(file).with_context(|| format!("failed to read `{}`", file.display()))?;
    println!("{}", content_hash(&content));
    Ok(())
}
