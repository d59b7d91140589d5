// scoring_publisher/src/build/archive.rs

//! Archive writing shared by the package and assemble stages.

use anyhow::Context;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;

pub type ArchiveWriter = ZipWriter<BufWriter<File>>;

fn partial_path(target: &Path) -> PathBuf {
  let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".partial");
  target.with_file_name(name)
}

/// Writes an archive next to `target` and renames it into place only when
/// `fill` and the final flush succeed. On failure nothing is left at `target`
/// and the partial file is removed.
pub fn write_archive<T>(target: &Path, fill: impl FnOnce(&mut ArchiveWriter) -> anyhow::Result<T>) -> anyhow::Result<T> {
  let partial = partial_path(target);
  let result = write_partial(&partial, fill).and_then(|value| {
    fs::rename(&partial, target).with_context(|| format!("moving archive into {}", target.display()))?;
    Ok(value)
  });
  if result.is_err() {
    let _ = fs::remove_file(&partial);
  }
  result
}

fn write_partial<T>(partial: &Path, fill: impl FnOnce(&mut ArchiveWriter) -> anyhow::Result<T>) -> anyhow::Result<T> {
  let file = File::create(partial).with_context(|| format!("creating {}", partial.display()))?;
  let mut writer = ZipWriter::new(BufWriter::new(file));
  let value = fill(&mut writer)?;
  let mut inner = writer.finish().context("finishing archive")?;
  inner.flush().context("flushing archive")?;
  Ok(value)
}
