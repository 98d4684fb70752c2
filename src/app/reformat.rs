//! Reformatting of the minified bundle into one-key-per-line text
//!
//! The extractor only works on text where every object key sits on its own
//! line, so each downloaded bundle goes through a [`Reformatter`] before it is
//! hashed and cached.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::constants::format;
use crate::errors::{ReformatError, ReformatResult};

/// Turns raw bundle text into line-oriented text
#[async_trait]
pub trait Reformatter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Reformat `raw` so that every key and closing brace starts a line
    async fn reformat(&self, raw: &str) -> ReformatResult<String>;
}

/// Which reformatter to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReformatterKind {
    /// External beautifier, falling back to the inline formatter when missing
    #[default]
    Auto,
    /// External beautifier only
    External,
    /// In-process formatter only
    Inline,
}

impl ReformatterKind {
    /// Build the reformatter, using `program` for the external beautifier
    pub fn build(self, program: &str) -> Box<dyn Reformatter> {
        match self {
            ReformatterKind::Auto => Box::new(AutoReformatter::new(program)),
            ReformatterKind::External => Box::new(ExternalBeautifier::new(program)),
            ReformatterKind::Inline => Box::new(InlineFormatter),
        }
    }
}

/// Runs an external beautifier (`js-beautify` by default) over a scratch copy
#[derive(Debug, Clone)]
pub struct ExternalBeautifier {
    program: String,
}

impl ExternalBeautifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ExternalBeautifier {
    fn default() -> Self {
        Self::new(format::BEAUTIFIER_PROGRAM)
    }
}

#[async_trait]
impl Reformatter for ExternalBeautifier {
    fn name(&self) -> &str {
        &self.program
    }

    async fn reformat(&self, raw: &str) -> ReformatResult<String> {
        let scratch = tempfile::Builder::new()
            .prefix("htb-bundle-")
            .suffix(".js")
            .tempfile()?;
        fs::write(scratch.path(), raw).await?;

        debug!("Running {} on {}", self.program, scratch.path().display());
        let status = Command::new(&self.program)
            .arg(scratch.path())
            .arg("--outfile")
            .arg(scratch.path())
            .stdout(Stdio::null())
            .status()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ReformatError::ProgramNotFound {
                    program: self.program.clone(),
                },
                _ => ReformatError::Spawn {
                    program: self.program.clone(),
                    source: e,
                },
            })?;

        if !status.success() {
            return Err(ReformatError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        Ok(fs::read_to_string(scratch.path()).await?)
    }
}

/// In-process formatter for object-literal dumps
///
/// Breaks lines after `{`, `[`, `,` and `;`, and before `}` and `]`, outside
/// string literals. `key:value` becomes `key: value` and whitespace runs
/// outside strings collapse to one space. Regex literals and comments are not
/// recognised, so a quote inside either throws the string tracking off.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineFormatter;

impl InlineFormatter {
    /// Lay out `raw` synchronously
    pub fn format(&self, raw: &str) -> String {
        let mut writer = LineWriter::default();
        let mut quote: Option<char> = None;
        let mut escaped = false;

        for c in raw.chars() {
            if let Some(open) = quote {
                writer.line.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == open {
                    quote = None;
                }
                continue;
            }

            match c {
                '"' | '\'' | '`' => {
                    quote = Some(c);
                    writer.line.push(c);
                }
                '{' | '[' => {
                    writer.line.push(c);
                    writer.flush();
                    writer.depth += 1;
                }
                '}' | ']' => {
                    writer.flush();
                    writer.depth = writer.depth.saturating_sub(1);
                    writer.line.push(c);
                }
                ',' | ';' => {
                    writer.line.push(c);
                    writer.flush();
                }
                ':' => writer.line.push_str(": "),
                c if c.is_whitespace() => {
                    if !writer.line.is_empty() && !writer.line.ends_with(' ') {
                        writer.line.push(' ');
                    }
                }
                c => writer.line.push(c),
            }
        }

        writer.flush();
        writer.out
    }
}

#[async_trait]
impl Reformatter for InlineFormatter {
    fn name(&self) -> &str {
        "inline"
    }

    async fn reformat(&self, raw: &str) -> ReformatResult<String> {
        Ok(self.format(raw))
    }
}

#[derive(Default)]
struct LineWriter {
    out: String,
    line: String,
    depth: usize,
}

impl LineWriter {
    fn flush(&mut self) {
        let trimmed = self.line.trim();
        if !trimmed.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(format::INDENT);
            }
            self.out.push_str(trimmed);
            self.out.push('\n');
        }
        self.line.clear();
    }
}

/// External beautifier with an in-process fallback when it is not installed
#[derive(Debug, Clone)]
pub struct AutoReformatter {
    external: ExternalBeautifier,
    inline: InlineFormatter,
}

impl AutoReformatter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            external: ExternalBeautifier::new(program),
            inline: InlineFormatter,
        }
    }
}

#[async_trait]
impl Reformatter for AutoReformatter {
    fn name(&self) -> &str {
        "auto"
    }

    async fn reformat(&self, raw: &str) -> ReformatResult<String> {
        match self.external.reformat(raw).await {
            Err(ReformatError::ProgramNotFound { program }) => {
                warn!(
                    "{} is not installed, using the inline formatter instead",
                    program
                );
                Ok(self.inline.format(raw))
            }
            other => other,
        }
    }
}
