//! The pandoc subprocess boundary.
//!
//! Pandoc owns both ends of the pipeline: it parses markdown into a JSON
//! AST and renders a (rewritten) AST back to HTML. Both calls are
//! synchronous, fully buffered round trips, no streaming. A non-zero exit
//! surfaces pandoc's stderr verbatim as the build error.
//!
//! The [`Converter`] trait is the seam: production code uses [`Pandoc`],
//! tests substitute a mock that serves canned documents (see
//! `test_helpers`), so the whole compile pipeline is exercisable without
//! pandoc installed.

use crate::ast::Document;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Markdown dialect pandoc parses. The extension lets a list follow a
/// paragraph without a blank line, which reads naturally in essay sources.
const INPUT_FORMAT: &str = "markdown+lists_without_preceding_blankline";

#[derive(Error, Debug)]
pub enum PandocError {
    #[error("failed to invoke {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed: {stderr}")]
    Failed { program: String, stderr: String },
    #[error("malformed document AST: {0}")]
    Ast(#[from] serde_json::Error),
}

/// Document parse/render boundary.
pub trait Converter {
    /// Parse a markdown source file into a document tree.
    fn parse(&self, source: &Path) -> Result<Document, PandocError>;

    /// Render a document tree to an HTML fragment.
    fn render(&self, doc: &Document) -> Result<String, PandocError>;
}

/// The production converter: shells out to `pandoc`.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: String,
}

impl Default for Pandoc {
    fn default() -> Self {
        Pandoc {
            program: "pandoc".to_string(),
        }
    }
}

impl Pandoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (tests point this at nonsense paths).
    pub fn with_program(program: impl Into<String>) -> Self {
        Pandoc {
            program: program.into(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> PandocError {
        PandocError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl Converter for Pandoc {
    fn parse(&self, source: &Path) -> Result<Document, PandocError> {
        let output = Command::new(&self.program)
            .args(["--from", INPUT_FORMAT, "--to", "json"])
            .arg(source)
            .output()
            .map_err(|e| self.io_error(e))?;
        if !output.status.success() {
            return Err(PandocError::Failed {
                program: self.program.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn render(&self, doc: &Document) -> Result<String, PandocError> {
        let payload = serde_json::to_vec(doc)?;
        let mut child = Command::new(&self.program)
            .args(["--from", "json", "--to", "html"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.io_error(e))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).map_err(|e| self.io_error(e))?;
        }
        let output = child.wait_with_output().map_err(|e| self.io_error(e))?;
        if !output.status.success() {
            return Err(PandocError::Failed {
                program: self.program.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
