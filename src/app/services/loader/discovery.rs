//! Input discovery and purging
//!
//! Walks the input root recursively, classifies every candidate file by its
//! suffix, and drops what cannot or should not be loaded: unrecognized
//! suffixes, empty files, time-domain files (recognized but not parsed), and
//! families disabled by the load flags.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::app::models::{DataFileInfo, FileFormat};
use crate::config::Config;
use crate::{Error, Result};

/// Discover the load set under the configured input root
///
/// The returned files are sorted by path for a deterministic queue order and
/// numbered with their position in the load set.
pub fn discover_files(config: &Config) -> Result<Vec<DataFileInfo>> {
    if !config.input_path.exists() {
        return Err(Error::configuration(format!(
            "Input path does not exist: {}",
            config.input_path.display()
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(&config.input_path).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy();

        let Some(format) = FileFormat::classify(&name) else {
            debug!("Purging unrecognized file: {}", path.display());
            continue;
        };

        if !format.is_parsed() {
            warn!(
                "Time-domain file recognized but not supported, skipping: {}",
                path.display()
            );
            continue;
        }

        if !family_enabled(config, format) {
            debug!(
                "Family {} disabled by load flags, skipping: {}",
                format.label(),
                path.display()
            );
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Skipping file without metadata '{}': {}", path.display(), e);
                continue;
            }
        };

        if metadata.len() == 0 {
            warn!("Skipping empty file: {}", path.display());
            continue;
        }

        let mod_date: Option<DateTime<Utc>> =
            metadata.modified().ok().map(DateTime::<Utc>::from);

        files.push(DataFileInfo {
            path: path.to_path_buf(),
            format,
            file_row: 0,
            size: metadata.len(),
            mod_date,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    for (index, file) in files.iter_mut().enumerate() {
        file.file_row = index;
    }

    debug!(
        "Discovered {} loadable files under {}",
        files.len(),
        config.input_path.display()
    );

    Ok(files)
}

/// Build the shared work queue from the discovered load set
pub fn build_work_queue(files: Vec<DataFileInfo>) -> VecDeque<DataFileInfo> {
    files.into_iter().collect()
}

fn family_enabled(config: &Config, format: FileFormat) -> bool {
    match format {
        FileFormat::Stat => config.flags.load_stat,
        FileFormat::Vsdb => config.flags.load_vsdb,
        FileFormat::ObjectCts | FileFormat::ObjectObj => config.flags.load_object,
        FileFormat::TimeDomain => false,
    }
}
