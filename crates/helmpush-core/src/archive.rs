//! Chart packaging
//!
//! Writes a chart to `<name>-<version>.tgz` in the layout Helm expects: every
//! entry lives under `<name>/` and `Chart.yaml` comes first.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tar::{Builder, Header};

use crate::chart::{CHART_FILE, Chart};
use crate::error::Result;

/// File name of the package for a chart, e.g. `mychart-0.1.0.tgz`
#[must_use]
pub fn package_file_name(chart: &Chart) -> String {
    format!("{}-{}.tgz", chart.name(), chart.version())
}

/// Package a chart into `dest_dir`, returning the archive path
///
/// `Chart.yaml` is serialized from the in-memory chart so that a version
/// override is reflected in the package.
pub fn create_package(chart: &Chart, dest_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dest_dir)?;
    let output = dest_dir.join(package_file_name(chart));

    let file = File::create(&output)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    let prefix = chart.name();
    let chart_yaml = chart.chart_yaml()?;
    add_bytes_to_archive(
        &mut builder,
        &format!("{}/{}", prefix, CHART_FILE),
        chart_yaml.as_bytes(),
    )?;

    for file in chart.files() {
        add_bytes_to_archive(&mut builder, &format!("{}/{}", prefix, file.path), &file.data)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    tracing::debug!(path = %output.display(), files = chart.files().len() + 1, "packaged chart");
    Ok(output)
}

/// Add bytes to a tar archive with a given path
fn add_bytes_to_archive<W: Write>(
    builder: &mut Builder<W>,
    archive_path: &str,
    content: &[u8],
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    header.set_cksum();

    builder.append_data(&mut header, archive_path, content)?;

    Ok(())
}
