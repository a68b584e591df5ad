//! Tera rendering engine: [`OutputFormat`] and [`Renderer`].
//!
//! | Format         | Used by                                   |
//! |----------------|-------------------------------------------|
//! | `EnvLocal`     | `.env.local` written by create / switch   |
//! | `ShellExports` | `forks env --format shell`                |
//! | `Dotenv`       | `forks env --format dotenv`               |

use std::collections::HashMap;

use tera::{Tera, Value};

use crate::context::EnvFileContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("env_local.tera", include_str!("templates/env_local.tera")),
    ("shell_exports.tera", include_str!("templates/shell_exports.tera")),
    ("dotenv.tera", include_str!("templates/dotenv.tera")),
];

/// Single-quote `value` for POSIX shells: `it's` becomes `'it'\''s'`.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn shell_quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(Value::String(shell_quote(&raw)))
}

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.register_filter("shell_quote", shell_quote_filter);
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    EnvLocal,
    ShellExports,
    Dotenv,
}

impl OutputFormat {
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::EnvLocal,
            OutputFormat::ShellExports,
            OutputFormat::Dotenv,
        ]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            OutputFormat::EnvLocal     => "env_local.tera",
            OutputFormat::ShellExports => "shell_exports.tera",
            OutputFormat::Dotenv       => "dotenv.tera",
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders [`EnvFileContext`] into any [`OutputFormat`].
///
/// Create once with [`Renderer::new`] and reuse. Output always uses LF line
/// endings, whatever the checkout did to the embedded templates.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { tera: build_tera()? })
    }

    pub fn render(&self, ctx: &EnvFileContext, format: OutputFormat) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let rendered = self.tera.render(format.template_name(), &tera_ctx)?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
