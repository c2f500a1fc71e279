use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;
use spritesheet_core::prelude::*;
use tracing::info;

/// `<base>.<ext>`, appended rather than replacing any dot already in `base`.
pub fn sibling_path(base: &Path, ext: &str) -> PathBuf {
    let mut s: OsString = base.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    Ok(())
}

pub fn write_sheet_png(base: &Path, canvas: &RgbaImage) -> anyhow::Result<PathBuf> {
    let png_path = sibling_path(base, "png");
    ensure_parent(&png_path)?;
    canvas
        .save(&png_path)
        .with_context(|| format!("write {}", png_path.display()))?;
    info!(?png_path, "sheet image written");
    Ok(png_path)
}

/// Writes the coordinate file next to the sheet and returns its path.
pub fn write_metadata(
    base: &Path,
    meta: &SheetMetadata,
    format: MetadataFormat,
) -> anyhow::Result<PathBuf> {
    let path = sibling_path(base, format.extension());
    ensure_parent(&path)?;
    let text = render_metadata(base, meta, format)?;
    fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    info!(?path, sprites = meta.len(), "metadata written");
    Ok(path)
}

pub fn render_metadata(
    base: &Path,
    meta: &SheetMetadata,
    format: MetadataFormat,
) -> anyhow::Result<String> {
    Ok(match format {
        MetadataFormat::Lua => to_lua(meta),
        MetadataFormat::Json => {
            let png_path = sibling_path(base, "png");
            let image = png_path.file_name().map(|s| s.to_string_lossy().into_owned());
            to_json_string(meta, image.as_deref())?
        }
    })
}

pub fn write_stats(path: &Path, stats: &SheetStats) -> anyhow::Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(stats)?)
        .with_context(|| format!("write {}", path.display()))?;
    info!(stats_path = ?path, "stats exported");
    Ok(())
}
