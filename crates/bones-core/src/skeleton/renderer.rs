//! Template rendering for suffixed skeleton files
//!
//! Files ending in the template suffix (`.bns` by default) are rendered with
//! Tera against a [`Bindings`] map, written without the suffix, and removed.
//! Templates only see the bindings they are given:
//!
//! ```text
//! module {{ classname }}
//! {% if author %}  # by {{ author }}{% endif %}
//! end
//! ```

use super::walker::walk_error;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Binding that always holds the project name
pub const NAME_BINDING: &str = "name";

/// Binding holding the project name in UpperCamelCase
pub const CLASSNAME_BINDING: &str = "classname";

/// Values available to templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bindings(BTreeMap<String, String>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for a project: `name` and `classname`
    pub fn for_project(name: &str) -> Self {
        let mut bindings = Self::new();
        bindings.insert(NAME_BINDING, name);
        bindings.insert(CLASSNAME_BINDING, classname(name));
        bindings
    }

    /// Add extra bindings without replacing existing keys
    pub fn with_defaults(mut self, extra: &BTreeMap<String, String>) -> Self {
        for (key, value) in extra {
            self.0
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME_BINDING)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn to_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.0 {
            context.insert(key.as_str(), value);
        }
        context
    }
}

/// `foo_bar` and `foo-bar` become `FooBar`
pub fn classname(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Renders every template file under a root directory
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    suffix: String,
    placeholder: Option<String>,
}

impl TemplateRenderer {
    /// Create a renderer for files ending in `suffix`
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            placeholder: None,
        }
    }

    /// Also replace `placeholder` in output file names with the `name` binding
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Render all templates under `root`, returning the rendered output paths.
    ///
    /// Stops at the first failure; templates rendered before it stay rendered.
    /// An existing output file is never overwritten: the render fails with
    /// [`Error::NameCollision`] instead.
    pub fn render(&self, root: &Path, bindings: &Bindings) -> Result<Vec<PathBuf>> {
        let templates = self.find_templates(root)?;
        let context = bindings.to_context();

        let mut rendered = Vec::with_capacity(templates.len());
        for template in templates {
            rendered.push(self.render_file(&template, bindings, &context)?);
        }

        tracing::info!("Rendered {} templates in {}", rendered.len(), root.display());
        Ok(rendered)
    }

    fn find_templates(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut templates = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = match entry.file_name().to_str() {
                Some(name) => name,
                None if entry.file_name().to_string_lossy().ends_with(&self.suffix) => {
                    return Err(non_utf8_name(entry.path()));
                }
                None => continue,
            };
            if self.output_name(file_name, None).is_some() {
                templates.push(entry.into_path());
            }
        }
        Ok(templates)
    }

    /// Output file name for a template, or `None` if `file_name` is not a template.
    /// The placeholder is replaced only where it is a whole `.`-delimited part
    /// of the name, so `NAME.rb.bns` renders to `foo.rb` but `NAMESPACE.md.bns`
    /// keeps its name.
    fn output_name(&self, file_name: &str, project_name: Option<&str>) -> Option<String> {
        let stem = file_name.strip_suffix(self.suffix.as_str())?;
        if stem.is_empty() {
            return None;
        }

        match (&self.placeholder, project_name) {
            (Some(placeholder), Some(name)) if !placeholder.is_empty() => Some(
                stem.split('.')
                    .map(|part| if part == placeholder.as_str() { name } else { part })
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => Some(stem.to_string()),
        }
    }

    fn render_file(
        &self,
        template: &Path,
        bindings: &Bindings,
        context: &tera::Context,
    ) -> Result<PathBuf> {
        let file_name = template
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| non_utf8_name(template))?;
        let output_name = self
            .output_name(file_name, bindings.name())
            .ok_or_else(|| Error::TemplateRender {
                path: template.to_path_buf(),
                message: format!("file name does not end with '{}'", self.suffix),
            })?;
        let output = template.with_file_name(output_name);

        if fs::symlink_metadata(&output).is_ok() {
            return Err(Error::NameCollision {
                from: template.to_path_buf(),
                to: output,
            });
        }

        let permissions = fs::metadata(template)
            .map_err(|e| Error::io("read", template, e))?
            .permissions();
        let source = fs::read_to_string(template).map_err(|e| Error::io("read", template, e))?;

        let content =
            tera::Tera::one_off(&source, context, false).map_err(|e| Error::TemplateRender {
                path: template.to_path_buf(),
                message: error_chain(&e),
            })?;

        if let Err(e) = write_output(&output, &content, &permissions) {
            let _ = fs::remove_file(&output);
            return Err(e);
        }

        fs::remove_file(template).map_err(|e| Error::io("remove template", template, e))?;
        tracing::debug!("Rendered {} to {}", template.display(), output.display());

        Ok(output)
    }
}

fn write_output(
    output: &Path,
    content: &str,
    template_permissions: &fs::Permissions,
) -> Result<()> {
    fs::write(output, content).map_err(|e| Error::io("write", output, e))?;
    copy_executable_bits(template_permissions, output)
}

/// Give `output` the executable bits of the template
#[cfg(unix)]
fn copy_executable_bits(template_permissions: &fs::Permissions, output: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let exec_bits = template_permissions.mode() & 0o111;
    let mut permissions = fs::metadata(output)
        .map_err(|e| Error::io("read", output, e))?
        .permissions();
    permissions.set_mode((permissions.mode() & !0o111) | exec_bits);
    fs::set_permissions(output, permissions)
        .map_err(|e| Error::io("set permissions on", output, e))
}

#[cfg(not(unix))]
fn copy_executable_bits(_template_permissions: &fs::Permissions, _output: &Path) -> Result<()> {
    Ok(())
}

fn non_utf8_name(path: &Path) -> Error {
    Error::io(
        "render",
        path,
        io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
    )
}

/// Tera wraps the useful message in its source chain
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
