//! Reading the contents of charm and bundle archives.

use std::io::{self, Read};

use serde::{Deserialize, Serialize};

/// A regular file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestFile {
    pub name: String,
    pub size: u64,
}

/// Lists the regular files of a tar archive in archive order.
///
/// Directories, links and other special entries are skipped. Leading `./`
/// components are stripped from names.
pub fn read_manifest<R: Read>(reader: R) -> io::Result<Vec<ManifestFile>> {
    let mut archive = tar::Archive::new(reader);
    let mut files = Vec::new();

    for entry in archive.entries()? {
        let entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path()?;
        let name = path.to_string_lossy();
        let name = name.trim_start_matches("./");
        if name.is_empty() {
            continue;
        }

        files.push(ManifestFile {
            name: name.to_string(),
            size: entry.header().size()?,
        });
    }

    Ok(files)
}
