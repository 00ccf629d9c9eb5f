//! Module resolution and detection of the logger import.

use std::path::{Component, Path, PathBuf};

use crate::transform::imports::ImportRecord;
use crate::transform::token::Span;

/// The host's module resolution: turns an import specifier seen in
/// `importer` into an absolute module id, or `None` if it cannot.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleResolver {
    fn resolve(&self, specifier: &str, importer: &str) -> Option<String>;
}

pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Resolves root-absolute and relative specifiers against the file system.
/// Bare package specifiers are never resolved.
#[derive(Debug, Clone)]
pub struct FsResolver {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsResolver {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, base: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![base.to_path_buf()];
        for extension in &self.extensions {
            let mut with_extension = base.as_os_str().to_owned();
            with_extension.push(".");
            with_extension.push(extension);
            candidates.push(PathBuf::from(with_extension));
        }
        for extension in &self.extensions {
            candidates.push(base.join(format!("index.{extension}")));
        }
        candidates
    }
}

impl ModuleResolver for FsResolver {
    fn resolve(&self, specifier: &str, importer: &str) -> Option<String> {
        let base = if let Some(rooted) = specifier.strip_prefix('/') {
            self.root.join(rooted)
        } else if specifier.starts_with("./") || specifier.starts_with("../") {
            Path::new(importer).parent()?.join(specifier)
        } else {
            return None;
        };
        let base = normalize(&base);
        self.candidates(&base)
            .into_iter()
            .find(|candidate| candidate.is_file())
            .map(|found| found.to_string_lossy().into_owned())
    }
}

/// Resolve `.` and `..` components without touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// `resolved` relative to `root`, with a leading `/` and any query stripped.
/// `None` when the module lies outside the root.
pub fn project_path(resolved: &str, root: &str) -> Option<String> {
    let resolved = resolved.split('?').next().unwrap_or(resolved);
    let root = root.trim_end_matches('/');
    let relative = resolved.strip_prefix(root)?;
    if !relative.starts_with('/') {
        return None;
    }
    Some(relative.replace('\\', "/"))
}

/// The import statement that binds the logger module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local_names: Vec<String>,
    pub span: Span,
    pub resolved_id: String,
}

/// Find the first import whose specifier resolves to `logger_path`
/// (project-relative, leading `/`). Imports that bind no usable names,
/// dynamic imports and unresolvable specifiers are skipped.
pub fn resolve_logger_import(
    imports: &[ImportRecord],
    importer: &str,
    root: &str,
    logger_path: &str,
    resolver: &dyn ModuleResolver,
) -> Option<ImportBinding> {
    imports.iter().find_map(|record| {
        let local_names = record.local_names();
        if !record.is_static() || local_names.is_empty() {
            return None;
        }
        let specifier = record.specifier.as_deref()?;
        let Some(resolved) = resolver.resolve(specifier, importer) else {
            log::debug!("{importer}: cannot resolve {specifier:?}, skipping");
            return None;
        };
        if project_path(&resolved, root).as_deref() != Some(logger_path) {
            return None;
        }
        Some(ImportBinding {
            local_names: local_names.into_iter().map(str::to_string).collect(),
            span: record.span,
            resolved_id: resolved,
        })
    })
}
