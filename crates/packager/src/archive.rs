use crate::emit::OutputLayout;
use crate::error::Result;
use crate::files::{collect_files, relative_slash_path};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const OUTPUTS_DIR: &str = "agents/outputs";
pub const OUTPUTS_BUNDLE: &str = "agents/all-llm-outputs.zip";

/// Write `(entry name, source file)` pairs into a fresh archive at `target`.
///
/// Entries are sorted by name and stamped 1980-01-01 00:00:00 so identical
/// inputs produce identical bytes.
fn write_archive(target: &Path, mut entries: Vec<(String, PathBuf)>) -> Result<usize> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let options = SimpleFileOptions::default()
        .last_modified_time(zip::DateTime::default())
        .compression_method(zip::CompressionMethod::Deflated);

    let mut zip = ZipWriter::new(File::create(target)?);
    for (name, source) in &entries {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&fs::read(source)?)?;
    }
    zip.finish()?;
    Ok(entries.len())
}

/// Archive every file under `src` into `target`, keyed by relative path.
/// Returns the number of entries written.
pub fn zip_directory(src: &Path, target: &Path) -> Result<usize> {
    let entries = collect_files(src)?
        .into_iter()
        .filter(|path| path != target)
        .map(|path| -> Result<(String, PathBuf)> {
            Ok((relative_slash_path(src, &path)?, path))
        })
        .collect::<Result<Vec<_>>>()?;
    write_archive(target, entries)
}

/// `flows/<id>/` → `flows/<id>.zip`. `None` when the flow was never written.
pub fn zip_flow(layout: &OutputLayout, flow_id: &str) -> Result<Option<PathBuf>> {
    let dir = layout.flow_dir(flow_id);
    if !dir.is_dir() {
        log::warn!("Flow directory {} missing; skipping archive", dir.display());
        return Ok(None);
    }
    let target = layout.flow_zip(flow_id);
    let entries = zip_directory(&dir, &target)?;
    log::debug!("Archived {entries} files into {}", target.display());
    Ok(Some(target))
}

/// Bundle every per-flow archive under `flows/` into `master.zip`.
/// Returns the number of flow archives included.
pub fn zip_master(layout: &OutputLayout) -> Result<usize> {
    let flows_dir = layout.flows_dir();
    fs::create_dir_all(&flows_dir)?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(&flows_dir)? {
        let path = entry?.path();
        let is_zip = path.extension().is_some_and(|ext| ext == "zip");
        if is_zip && path.is_file() {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            if let Some(name) = name {
                entries.push((format!("flows/{name}"), path));
            }
        }
    }

    let count = write_archive(&layout.master_zip(), entries)?;
    log::info!(
        "Packed {count} flow archives into {}",
        layout.master_zip().display()
    );
    Ok(count)
}

/// Zip `agents/outputs` into `agents/all-llm-outputs.zip`. `None` when there is
/// nothing to bundle.
pub fn bundle_outputs(base: &Path) -> Result<Option<PathBuf>> {
    let src = base.join(OUTPUTS_DIR);
    if !src.is_dir() {
        log::warn!("No {} directory found; skipping bundle", src.display());
        return Ok(None);
    }
    let target = base.join(OUTPUTS_BUNDLE);
    let entries = zip_directory(&src, &target)?;
    log::info!("Bundled {entries} LLM outputs into {}", target.display());
    Ok(Some(target))
}
