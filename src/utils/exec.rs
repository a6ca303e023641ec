//! External command execution utilities.
//!
//! Builder-based API for running external processes with stdin piping and
//! captured output.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Simple command
//! Cmd::new("sass").arg("--stdin").stdin(sheet).run()?;
//!
//! // From a configured command array
//! Cmd::from_slice(&["sass", "--stdin"]).stdin(sheet).run()?;
//! ```

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::{
    ffi::{OsStr, OsString},
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    stdin_data: Option<Vec<u8>>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["sass", "--stdin"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set stdin data to pipe to the process.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.as_ref().to_vec());
        self
    }

    /// Run the command and capture its output.
    pub fn run(self) -> Result<Output> {
        let display = self.program.to_string_lossy().into_owned();

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        command.stdin(if self.stdin_data.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn `{display}`"))?;

        if let Some(data) = self.stdin_data {
            let mut stdin = child
                .stdin
                .take()
                .with_context(|| format!("failed to open stdin of `{display}`"))?;
            // The child may exit without draining stdin; that is not an
            // execution failure.
            if let Err(err) = stdin.write_all(&data) {
                if err.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(err)
                        .with_context(|| format!("failed to write stdin of `{display}`"));
                }
            }
            // Dropping stdin closes the pipe so the child sees EOF.
        }

        child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{display}`"))
    }
}
