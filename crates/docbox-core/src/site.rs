use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::{engine::TemplateRenderer, error::RenderError};

/// Inputs for rendering a whole template directory.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File extensions (without dot) treated as pages.
    pub extensions: Vec<String>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("site"),
            extensions: vec!["html".to_string()],
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct BuildReport {
    /// Rendered pages, relative to the output directory.
    pub pages: Vec<PathBuf>,
    /// Partials and files with other extensions.
    pub skipped: usize,
}

/// Render every page under `templates_dir` into `output_dir`, keeping the
/// relative layout. Files starting with `_` are partials and are only
/// reachable through `include`/`extends`. An output directory nested in the
/// templates directory is not walked.
pub fn build_site<S: Serialize>(
    options: &SiteOptions,
    ctx: &S,
) -> Result<BuildReport, RenderError> {
    let renderer = TemplateRenderer::from_dir(&options.templates_dir);
    let mut report = BuildReport::default();

    fs::create_dir_all(&options.output_dir).map_err(|source| RenderError::Io {
        path: options.output_dir.clone(),
        source,
    })?;
    let output_root = fs::canonicalize(&options.output_dir).map_err(|source| RenderError::Io {
        path: options.output_dir.clone(),
        source,
    })?;

    let walker = WalkDir::new(&options.templates_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_output_dir(entry, &output_root));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&options.templates_dir) else {
            continue;
        };
        if !is_page(relative, &options.extensions) {
            report.skipped += 1;
            continue;
        }

        let name = template_name(relative);
        let html = renderer.render(&name, ctx)?;

        let target = options.output_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, html).map_err(|source| RenderError::Io {
            path: target.clone(),
            source,
        })?;
        debug!(
            target: "docbox_core",
            template = %name,
            output = %target.display(),
            "page rendered"
        );
        report.pages.push(relative.to_path_buf());
    }

    info!(
        target: "docbox_core",
        templates_dir = ?renderer.root(),
        output_dir = %options.output_dir.display(),
        pages = report.pages.len(),
        skipped = report.skipped,
        "site build finished"
    );
    Ok(report)
}

fn is_output_dir(entry: &DirEntry, output_root: &Path) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && fs::canonicalize(entry.path()).is_ok_and(|path| path == output_root)
}

fn is_page(relative: &Path, extensions: &[String]) -> bool {
    let partial = relative
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('_'));
    if partial {
        return false;
    }
    relative
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}

// Loader names always use forward slashes.
fn template_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
