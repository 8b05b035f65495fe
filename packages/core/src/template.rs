//! Word (`.docx`) template rendering.
//!
//! A `.docx` file is a zip container of XML parts. Placeholders such as
//! `{{ ADDRESS }}` live in the text runs of the body, headers and footers.
//! Word frequently splits a placeholder across several runs when it is
//! typed or spell-checked, so the markup between `{{` and `}}` is removed
//! before the expression is handed to handlebars.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::sync::LazyLock;

use handlebars::Handlebars;
use regex::{Captures, Regex};
use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{DocumentError, Result};

/// XML parts that may carry placeholders.
#[allow(clippy::expect_used)]
static RENDERABLE_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^word/(document|header\d*|footer\d*|footnotes|endnotes)\.xml$")
        .expect("valid regex")
});

/// Opening braces separated by run markup: `{</w:t></w:r><w:r><w:t>{`.
#[allow(clippy::expect_used)]
static SPLIT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?:<[^>]*>)+\{").expect("valid regex"));

/// Closing braces separated by run markup.
#[allow(clippy::expect_used)]
static SPLIT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}(?:<[^>]*>)+\}").expect("valid regex"));

/// A complete placeholder, possibly containing markup.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("valid regex"));

#[allow(clippy::expect_used)]
static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Jinja-style index access: `SELLERS_DICT[0]`.
#[allow(clippy::expect_used)]
static INDEX_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("valid regex"));

/// Escape text for inclusion in an XML text node.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reverse the entity escaping Word applies to the text of an expression.
fn unescape_xml(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Rewrite an XML part so every placeholder is a clean handlebars
/// expression.
///
/// Markup inside a placeholder is dropped. Because both braces sit in text
/// runs of the same paragraph, the removed tags are a balanced sequence of
/// closing and re-opening run elements.
pub fn repair_placeholders(xml: &str) -> String {
    let xml = SPLIT_OPEN.replace_all(xml, "{{");
    let xml = SPLIT_CLOSE.replace_all(&xml, "}}");

    PLACEHOLDER
        .replace_all(&xml, |caps: &Captures<'_>| {
            let inner = MARKUP.replace_all(&caps[1], "");
            let inner = unescape_xml(&inner);
            let inner = INDEX_ACCESS.replace_all(&inner, ".[$1]");
            format!("{{{{{inner}}}}}")
        })
        .into_owned()
}

/// Placeholder engine shared by all templates of a run.
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(escape_xml);
        registry.set_strict_mode(false);
        Self { registry }
    }

    /// Render the placeholders of one XML part.
    pub fn render_xml(&self, xml: &str, context: &Value) -> std::result::Result<String, String> {
        let prepared = repair_placeholders(xml);
        self.registry
            .render_template(&prepared, context)
            .map_err(|e| e.to_string())
    }
}

/// One file inside the docx container.
struct DocxPart {
    name: String,
    data: Vec<u8>,
}

/// A `.docx` template loaded into memory.
pub struct DocxTemplate {
    name: String,
    parts: Vec<DocxPart>,
}

impl DocxTemplate {
    /// Load a template from disk.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DocumentError::MissingTemplate(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(path)?;
        Self::from_bytes(name, bytes)
    }

    /// Load a template from the raw bytes of a `.docx` file.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            parts.push(DocxPart {
                name: file.name().to_string(),
                data,
            });
        }

        Ok(Self {
            name: name.into(),
            parts,
        })
    }

    /// File name of the template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill all placeholders and return the bytes of the new document.
    pub fn render(&self, engine: &TemplateEngine, context: &Value) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            writer.start_file(part.name.as_str(), options)?;

            if RENDERABLE_PART.is_match(&part.name) {
                let xml = std::str::from_utf8(&part.data).map_err(|e| {
                    DocumentError::TemplateRender {
                        template: self.name.clone(),
                        message: format!("{} is not UTF-8: {e}", part.name),
                    }
                })?;
                let rendered =
                    engine
                        .render_xml(xml, context)
                        .map_err(|message| DocumentError::TemplateRender {
                            template: self.name.clone(),
                            message: format!("{}: {message}", part.name),
                        })?;
                writer.write_all(rendered.as_bytes())?;
            } else {
                writer.write_all(&part.data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Render and write the document to `path`.
    pub fn render_to_file(&self, engine: &TemplateEngine, context: &Value, path: &Path) -> Result<()> {
        let bytes = self.render(engine, context)?;
        fs::write(path, bytes)?;
        tracing::debug!(template = %self.name, output = %path.display(), "rendered document");
        Ok(())
    }
}
