use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

/// An input image and the sprite name derived from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub path: PathBuf,
}

/// Collects the image files under `input`, sorted by sprite name.
///
/// Only direct children are scanned unless `recursive` is set. Sprites are
/// named after the file stem, or after the relative path without extension
/// (with `/` separators) when recursing.
pub fn gather_inputs(
    input: &Path,
    recursive: bool,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<InputFile>> {
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;

    let mut list = Vec::new();
    if input.is_file() {
        if !should_skip(input, inc_set.as_ref(), exc_set.as_ref()) && is_image(input) {
            if let Some(name) = file_stem(input) {
                list.push(InputFile {
                    name,
                    path: input.to_path_buf(),
                });
            }
        }
        return Ok(list);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    for entry in WalkDir::new(input)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let p = entry.path();
        if !entry.file_type().is_file() || !is_image(p) {
            continue;
        }
        let rel = p.strip_prefix(input).unwrap_or(p);
        if should_skip(rel, inc_set.as_ref(), exc_set.as_ref()) {
            continue;
        }
        let name = if recursive {
            relative_name(rel)
        } else {
            file_stem(p)
        };
        if let Some(name) = name {
            list.push(InputFile {
                name,
                path: p.to_path_buf(),
            });
        }
    }
    list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp")
    )
}

fn file_stem(p: &Path) -> Option<String> {
    p.file_stem().map(|s| s.to_string_lossy().into_owned())
}

fn relative_name(rel: &Path) -> Option<String> {
    let stem = file_stem(rel)?;
    match rel.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(format!(
            "{}/{}",
            parent.to_string_lossy().replace('\\', "/"),
            stem
        )),
        _ => Some(stem),
    }
}
