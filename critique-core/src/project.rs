//! Project bundler: gathers a source tree into one review document.
//!
//! The walk is glob-based and filtered by directory name, file name and
//! extension. Limits on file count and total bytes stop the walk early; the
//! files collected so far are kept and the reason is reported in
//! [`ProjectBundle::errors`].

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::LimitsSection;
use crate::error::ProjectError;

pub const IGNORE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "env",
    ".idea",
    ".vscode",
    "dist",
    "build",
    ".next",
    "coverage",
    "target",
];

pub const IGNORE_FILES: &[&str] = &[
    ".DS_Store",
    "package-lock.json",
    "yarn.lock",
    "Pipfile.lock",
    "Cargo.lock",
];

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "tsx", "jsx", "java", "go", "rs", "cpp", "cc", "c", "cs", "rb", "php", "sql",
    "kt", "swift", "scala", "r", "txt",
];

/// Collected sources keyed by `/`-separated path relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectBundle {
    pub files: BTreeMap<String, String>,
    pub errors: Vec<String>,
}

impl ProjectBundle {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn format_for_review(&self) -> String {
        format_for_review(&self.files)
    }

    pub fn stats(&self) -> ProjectStats {
        ProjectStats::from_files(&self.files)
    }
}

/// Walk `root` and collect every reviewable file within `limits`.
pub fn collect(root: &Path, limits: &LimitsSection) -> Result<ProjectBundle, ProjectError> {
    if !root.is_dir() {
        return Err(ProjectError::NotFound(root.display().to_string()));
    }
    // Glob output for "." or "./x" does not keep the root as a path prefix.
    let root = std::fs::canonicalize(root)
        .map_err(|_| ProjectError::NotFound(root.display().to_string()))?;
    let root = root.as_path();

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let mut candidates: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable path");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    let mut bundle = ProjectBundle::default();
    let mut total_bytes: u64 = 0;

    for path in candidates {
        let Some(relative) = relative_key(root, &path) else {
            warn!(path = %path.display(), "Skipping path outside the project root");
            continue;
        };
        if !is_reviewable(&relative) {
            debug!(path = %relative, "Skipping ignored file");
            continue;
        }

        total_bytes += std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if total_bytes > limits.max_project_bytes {
            bundle.errors.push(format!(
                "Total size exceeds {}KB limit",
                limits.max_project_bytes / 1024
            ));
            break;
        }
        if bundle.files.len() >= limits.max_project_files {
            bundle.errors.push(format!(
                "Maximum {} files limit reached",
                limits.max_project_files
            ));
            break;
        }

        match std::fs::read(&path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => {
                    bundle.files.insert(relative, content);
                }
                Err(_) => bundle
                    .errors
                    .push(format!("Could not read {relative} (not UTF-8)")),
            },
            Err(e) => bundle.errors.push(format!("Could not read {relative} ({e})")),
        }
    }

    info!(
        root = %root.display(),
        files = bundle.files.len(),
        bytes = total_bytes,
        errors = bundle.errors.len(),
        "Project collected"
    );
    Ok(bundle)
}

/// `path` relative to `root`, joined with `/`. `None` for anything outside `root`.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

fn is_reviewable(relative: &str) -> bool {
    let mut parts: Vec<&str> = relative.split('/').collect();
    let Some(file_name) = parts.pop() else {
        return false;
    };
    if parts.iter().any(|dir| IGNORE_DIRS.contains(dir)) {
        return false;
    }
    if IGNORE_FILES.contains(&file_name) || file_name.starts_with('.') {
        return false;
    }
    extension_of(file_name).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Lowercased extension without the dot.
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Review language for a file name, from its extension.
pub fn detect_language(file_name: &str) -> Option<&'static str> {
    let lang = match extension_of(file_name)?.as_str() {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "go" => "go",
        "rs" => "rust",
        "cpp" | "cc" => "c++",
        "c" => "c",
        "cs" => "c#",
        "rb" => "ruby",
        "php" => "php",
        "sql" => "sql",
        "kt" => "kotlin",
        "swift" => "swift",
        "scala" => "scala",
        "r" => "r",
        _ => return None,
    };
    Some(lang)
}

/// Lines as counted for display: a trailing newline opens one more (empty) line.
fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// Concatenate `files` into the document sent for a project review.
pub fn format_for_review(files: &BTreeMap<String, String>) -> String {
    let mut parts = Vec::with_capacity(files.len() + 1);
    parts.push(format!(
        "# Project Analysis Request\n**Total Files:** {}\n---\n",
        files.len()
    ));
    for (path, content) in files {
        let lang = detect_language(path).unwrap_or("text");
        parts.push(format!(
            "\n## File: `{path}`\n**Language:** {lang} | **Lines:** {}\n```{lang}\n{content}\n```\n",
            line_count(content)
        ));
    }
    parts.join("\n")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total_files: usize,
    pub total_lines: usize,
    pub total_chars: usize,
    /// Files per language; unknown extensions count as "other".
    pub languages: BTreeMap<String, usize>,
    /// Files per extension, dot included (".py"); empty for none.
    pub files_by_type: BTreeMap<String, usize>,
}

impl ProjectStats {
    pub fn from_files(files: &BTreeMap<String, String>) -> Self {
        let mut stats = Self {
            total_files: files.len(),
            ..Self::default()
        };
        for (path, content) in files {
            let lang = detect_language(path).unwrap_or("other");
            let ext = extension_of(path).map(|e| format!(".{e}")).unwrap_or_default();
            stats.total_lines += line_count(content);
            stats.total_chars += content.chars().count();
            *stats.languages.entry(lang.to_string()).or_default() += 1;
            *stats.files_by_type.entry(ext).or_default() += 1;
        }
        stats
    }
}
