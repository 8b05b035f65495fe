//! Document assembly: render every template for one deal.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::chunking::{overflow_chunks, PARTIES_PER_DOCUMENT};
use crate::config::{DECLARATION_OUTPUT_PREFIX, DECLARATION_TEMPLATE, DOCX_EXTENSION};
use crate::dates::normalize_contract_date;
use crate::error::{DocumentError, Result};
use crate::parties::format_party_list;
use crate::template::{DocxTemplate, TemplateEngine};
use crate::types::{
    AssemblyReport, DealValues, DocumentKind, PartyRecord, PartyRole, RenderedDocument,
};

/// Build the template context for a deal.
///
/// The caller's values are left untouched; the context carries the display
/// date and the joined `SELLERS_LIST` / `BUYERS_LIST` texts.
pub fn build_context(values: &DealValues) -> Result<Value> {
    let contract_date = normalize_contract_date(&values.contract_date)?;

    let mut context = values.extra.clone();
    context.insert("CONTRACT_DATE".into(), Value::String(contract_date));
    context.insert("ADDRESS".into(), Value::String(values.address.clone()));
    for role in [PartyRole::Sellers, PartyRole::Buyers] {
        set_parties(&mut context, role, values.parties(role))?;
    }

    Ok(Value::Object(context))
}

fn set_parties(
    context: &mut serde_json::Map<String, Value>,
    role: PartyRole,
    parties: &[PartyRecord],
) -> Result<()> {
    context.insert(role.records_key().into(), serde_json::to_value(parties)?);
    context.insert(
        role.list_key().into(),
        Value::String(format_party_list(parties)),
    );
    Ok(())
}

/// File name of a primary document: `"{template stem} {address}.docx"`.
///
/// Path separators in the address are replaced so the file stays inside
/// the output directory.
pub fn primary_file_name(template: &Path, address: &str) -> String {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let address = address.replace(['/', '\\'], "-");
    format!("{stem} {address}.{DOCX_EXTENSION}")
}

/// File name of an overflow declaration, e.g.
/// `"הצהרת נכונות פרטים - מוכרים נוספים1.docx"`.
pub fn overflow_file_name(role: PartyRole, index: usize) -> String {
    format!(
        "{DECLARATION_OUTPUT_PREFIX} - {}{index}.{DOCX_EXTENSION}",
        role.overflow_label()
    )
}

/// List the `.docx` templates of a directory, sorted by name.
///
/// Word lock files (`~$name.docx`) are skipped. Templates differing only in
/// the case of their extension would render to the same file, so only the
/// first of them in sort order is kept.
pub fn list_templates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut templates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let is_docx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION));
        let is_lock_file = entry.file_name().to_string_lossy().starts_with("~$");
        if is_docx && !is_lock_file {
            templates.push(path);
        }
    }
    templates.sort();

    let mut stems = HashSet::new();
    templates.retain(|path| {
        let unique = stems.insert(path.file_stem().map(|s| s.to_os_string()));
        if !unique {
            tracing::warn!(path = %path.display(), "skipping template with duplicate name");
        }
        unique
    });
    Ok(templates)
}

/// Renders a deal into a directory of Word documents.
pub struct DocumentAssembler {
    templates_dir: PathBuf,
    engine: TemplateEngine,
}

impl DocumentAssembler {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            engine: TemplateEngine::new(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Render every template, plus one declaration per overflow chunk.
    ///
    /// Writes into `output_dir`, which must already exist. The first IO or
    /// render failure aborts the run; documents written before it stay on
    /// disk.
    pub fn assemble(&self, values: &DealValues, output_dir: &Path) -> Result<AssemblyReport> {
        let context = build_context(values)?;
        if !output_dir.is_dir() {
            return Err(DocumentError::MissingOutputDir(output_dir.to_path_buf()));
        }

        let mut report = AssemblyReport::default();

        for template_path in list_templates(&self.templates_dir)? {
            let template = DocxTemplate::open(&template_path)?;
            let path = output_dir.join(primary_file_name(&template_path, &values.address));
            template.render_to_file(&self.engine, &context, &path)?;
            report.documents.push(RenderedDocument {
                path,
                kind: DocumentKind::Primary {
                    template: template.name().to_string(),
                },
            });
        }

        let limit = PARTIES_PER_DOCUMENT.get();
        if values.sellers.len() > limit || values.buyers.len() > limit {
            let declaration =
                DocxTemplate::open(&self.templates_dir.join(DECLARATION_TEMPLATE))?;
            for role in [PartyRole::Sellers, PartyRole::Buyers] {
                self.render_overflow(&declaration, &context, values, role, output_dir, &mut report)?;
            }
        }

        tracing::info!(
            address = %values.address,
            documents = report.len(),
            "assembled deal documents"
        );
        Ok(report)
    }

    fn render_overflow(
        &self,
        declaration: &DocxTemplate,
        context: &Value,
        values: &DealValues,
        role: PartyRole,
        output_dir: &Path,
        report: &mut AssemblyReport,
    ) -> Result<()> {
        for (position, chunk) in overflow_chunks(values.parties(role), PARTIES_PER_DOCUMENT)
            .into_iter()
            .enumerate()
        {
            let index = position + 1;
            let mut chunk_context = context.clone();
            if let Value::Object(map) = &mut chunk_context {
                set_parties(map, role, chunk)?;
            }

            let path = output_dir.join(overflow_file_name(role, index));
            declaration.render_to_file(&self.engine, &chunk_context, &path)?;
            tracing::debug!(role = role.as_str(), index, parties = chunk.len(), "rendered overflow declaration");
            report.documents.push(RenderedDocument {
                path,
                kind: DocumentKind::Overflow { role, index },
            });
        }
        Ok(())
    }
}
