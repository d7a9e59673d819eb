//! Zip archives of exported projects.

use std::{
    fs::File,
    io,
    path::Path,
};

use tracing::debug;
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::prelude::*;

/// Pack every file below `dir` into the zip file `archive`.
///
/// Entries are stored under `<prefix>/`. The archive itself may live inside
/// `dir`; it is not added to itself.
pub fn create_archive(dir: &Path, archive: &Path, prefix: &str) -> Result<()> {
    let mut writer = ZipWriter::new(File::create(archive)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.path() == archive {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        writer.start_file(format!("{prefix}/{}", relative.join("/")), options)?;
        io::copy(&mut File::open(entry.path())?, &mut writer)?;
    }

    writer.finish()?;
    debug!("Created archive {:?}", archive);
    Ok(())
}

/// Unpack `archive` into `destination`, creating it if needed.
pub fn extract_archive(archive: &Path, destination: &Path) -> Result<()> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    zip.extract(destination)?;
    debug!(
        "Extracted {} entries of {:?} into {:?}",
        zip.len(),
        archive,
        destination
    );
    Ok(())
}
