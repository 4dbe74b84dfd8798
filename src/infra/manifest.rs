// ============================================================
// Layer 6 — Manifest Writer
// ============================================================
// Writes a train or test manifest as CSV:
//
//   image,target
//   X001_a.png,1
//   X017_b.png,17
//
// The file is truncated first, so rerunning the split replaces
// the previous manifests instead of appending to them. Fields
// containing a comma, quote, or newline are quoted.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::data::splitter::ManifestRow;

pub const MANIFEST_HEADER: &str = "image,target";

pub fn write_manifest(path: &Path, rows: &[ManifestRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Cannot create manifest '{}'", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "{MANIFEST_HEADER}")?;
    for row in rows {
        writeln!(w, "{},{}", escape_field(&row.image), row.target)?;
    }
    w.flush()
        .with_context(|| format!("Cannot write manifest '{}'", path.display()))?;

    tracing::debug!("Wrote {} rows to '{}'", rows.len(), path.display());
    Ok(())
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
