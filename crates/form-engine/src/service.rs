//! Generation pipeline: fill a template, store the copy, render it
//!
//! Storage of templates, form data and generated paths lives outside the
//! engine and is reached through the traits below.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use form_types::{FillReport, FormData, GeneratedDocument, TemplateSchema};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::fill::fill_with_options;
use crate::render::FixedLayoutRenderer;

/// A stored template: its schema and the original upload
#[derive(Debug, Clone)]
pub struct TemplateRecord {
    pub schema: TemplateSchema,
    pub source_path: PathBuf,
}

/// Form data for one form, either current or a saved version
#[derive(Debug, Clone)]
pub struct FormRecord {
    pub template_id: String,
    pub version_id: Option<String>,
    pub data: FormData,
}

pub trait SchemaStore {
    fn get_schema(&self, template_id: &str) -> Result<Option<TemplateRecord>, EngineError>;
}

pub trait FormDataStore {
    /// Data of `version_id`, or the form's current data when `None`
    fn get_form_data(
        &self,
        form_id: &str,
        version_id: Option<&str>,
    ) -> Result<Option<FormRecord>, EngineError>;
}

pub trait GeneratedPathSink {
    fn save_generated_paths(&self, version_id: &str, docx: &Path, pdf: &Path)
        -> Result<(), EngineError>;

    fn generated_paths(&self, version_id: &str) -> Result<Option<(PathBuf, PathBuf)>, EngineError>;
}

/// Inputs of a single generation
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub template_path: &'a Path,
    pub schema: &'a TemplateSchema,
    pub data: &'a FormData,
    pub form_id: &'a str,
    pub version_id: Option<&'a str>,
}

/// Fill, write `<output_root>/<form_id>/form_<form_id>[_v<version>]_<timestamp>.docx`
/// and render it alongside. When rendering fails the `.docx` is removed.
pub fn generate(
    request: &GenerateRequest<'_>,
    config: &EngineConfig,
    renderer: &dyn FixedLayoutRenderer,
) -> Result<GeneratedDocument, EngineError> {
    let template = fs::read(request.template_path)?;
    let filled = fill_with_options(&template, request.schema, request.data, &config.fill_options())?;

    let dir = config.output_root.join(safe_component(request.form_id));
    fs::create_dir_all(&dir)?;
    let stem = output_stem(request.form_id, request.version_id, Utc::now());
    let (docx_path, mut file) = create_unique(&dir, &stem)?;

    if let Err(e) = file.write_all(&filled.bytes).and_then(|_| file.sync_all()) {
        drop(file);
        discard(&docx_path);
        return Err(e.into());
    }
    drop(file);

    match renderer.render(&docx_path) {
        Ok(pdf_path) => {
            info!(
                "Generated {} and {}",
                docx_path.display(),
                pdf_path.display()
            );
            Ok(GeneratedDocument {
                docx_path,
                pdf_path,
                report: filled.report,
            })
        }
        Err(e) => {
            warn!("Rendering {} failed: {}", docx_path.display(), e);
            discard(&docx_path);
            Err(e.into())
        }
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Could not remove {}: {}", path.display(), e);
    }
}

pub(crate) fn output_stem(form_id: &str, version_id: Option<&str>, now: DateTime<Utc>) -> String {
    let version = version_id
        .map(|v| format!("_v{}", safe_component(v)))
        .unwrap_or_default();
    format!(
        "form_{}{}_{}",
        safe_component(form_id),
        version,
        now.format("%Y%m%d_%H%M%S_%6f")
    )
}

/// Keep ids usable as a single path component. Dots are replaced too, so
/// no id can name the current or parent directory.
fn safe_component(id: &str) -> String {
    if id.is_empty() {
        return "_".to_string();
    }
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Create `<stem>.docx`, or `<stem>_<n>.docx` when it already exists
fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, File), EngineError> {
    let mut n = 0;
    loop {
        let name = if n == 0 {
            format!("{}.docx", stem)
        } else {
            format!("{}_{}.docx", stem, n)
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Generation wired to the external stores
pub struct DocumentService<S, F, G, R> {
    schemas: S,
    forms: F,
    paths: G,
    renderer: R,
    config: EngineConfig,
}

impl<S, F, G, R> DocumentService<S, F, G, R>
where
    S: SchemaStore,
    F: FormDataStore,
    G: GeneratedPathSink,
    R: FixedLayoutRenderer,
{
    pub fn new(schemas: S, forms: F, paths: G, renderer: R, config: EngineConfig) -> Self {
        Self {
            schemas,
            forms,
            paths,
            renderer,
            config,
        }
    }

    /// Generate documents for a form's current data or one of its versions.
    /// Paths are recorded against the version when there is one.
    pub fn generate_documents(
        &self,
        form_id: &str,
        version_id: Option<&str>,
    ) -> Result<GeneratedDocument, EngineError> {
        let form = self
            .forms
            .get_form_data(form_id, version_id)?
            .ok_or_else(|| EngineError::Collaborator(format!("Form not found: {}", form_id)))?;
        let template = self.schemas.get_schema(&form.template_id)?.ok_or_else(|| {
            EngineError::Collaborator(format!("Template not found: {}", form.template_id))
        })?;

        let version_id = version_id.or(form.version_id.as_deref());
        let request = GenerateRequest {
            template_path: &template.source_path,
            schema: &template.schema,
            data: &form.data,
            form_id,
            version_id,
        };
        let generated = generate(&request, &self.config, &self.renderer)?;

        if let Some(version_id) = version_id {
            self.paths
                .save_generated_paths(version_id, &generated.docx_path, &generated.pdf_path)?;
        }
        Ok(generated)
    }

    /// Reuse a version's documents while both files still exist
    pub fn existing_or_generate(
        &self,
        form_id: &str,
        version_id: &str,
    ) -> Result<GeneratedDocument, EngineError> {
        if let Some((docx_path, pdf_path)) = self.paths.generated_paths(version_id)? {
            if docx_path.exists() && pdf_path.exists() {
                return Ok(GeneratedDocument {
                    docx_path,
                    pdf_path,
                    report: FillReport::default(),
                });
            }
        }
        self.generate_documents(form_id, Some(version_id))
    }
}
