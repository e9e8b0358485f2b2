// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! File staging.

Resolves the source→destination maps of an [Overridables] into the ordered
list of archive entries a producer serializes. Globs are expanded here, and
the result is sorted by destination so archive output is deterministic
regardless of input order.
*/

use {
    crate::{
        error::{PackagingError, Result},
        package_info::Overridables,
    },
    std::{collections::BTreeMap, path::PathBuf},
};

/// What kind of archive member a staged entry becomes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StagedKind {
    /// A regular file copied from the builder host.
    Regular,
    /// A regular file marked as configuration.
    Config,
    /// A symbolic link pointing at the contained target.
    Symlink(String),
    /// A directory created empty.
    Dir,
}

/// One archive member prior to serialization.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StagedEntry {
    /// Path on the builder host. `None` for symlinks and directories.
    pub source: Option<PathBuf>,
    /// Absolute destination path inside the package.
    pub dest: String,
    pub kind: StagedKind,
    pub mode: u32,
    pub size: u64,
}

impl StagedEntry {
    /// Whether this entry carries file content.
    pub fn has_content(&self) -> bool {
        matches!(self.kind, StagedKind::Regular | StagedKind::Config)
    }

    /// Whether the config bit applies to this entry.
    pub fn is_config(&self) -> bool {
        matches!(self.kind, StagedKind::Config)
    }
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}

/// Expand one source glob, pairing every match with its destination.
///
/// A pattern matching nothing is an error. Matches that are not regular
/// files are skipped. When the pattern matches several files, or the
/// destination ends in `/`, the destination is treated as a directory and
/// the source file name is appended to it.
fn expand_glob(pattern: &str, dest: &str) -> Result<Vec<(PathBuf, String)>> {
    let mut matches = vec![];
    for entry in glob::glob(pattern)? {
        let path = entry.map_err(|e| PackagingError::Io(e.into_error()))?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(PackagingError::GlobFailure(pattern.to_string()));
    }

    if matches.len() == 1 && !dest.ends_with('/') {
        return Ok(vec![(matches.remove(0), dest.to_string())]);
    }

    matches
        .into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .ok_or_else(|| {
                    PackagingError::Format(format!("glob match has no file name: {}", path.display()))
                })?
                .to_string_lossy()
                .to_string();
            let dest = format!("{}/{}", dest.trim_end_matches('/'), name);
            Ok((path, dest))
        })
        .collect()
}

fn insert_entry(
    entries: &mut BTreeMap<String, StagedEntry>,
    entry: StagedEntry,
) -> Result<()> {
    if entries.contains_key(&entry.dest) {
        return Err(PackagingError::Validation(format!(
            "destination path {} is specified more than once",
            entry.dest
        )));
    }

    entries.insert(entry.dest.clone(), entry);

    Ok(())
}

/// Resolve an [Overridables] into archive entries, sorted by destination.
pub fn stage(overridables: &Overridables) -> Result<Vec<StagedEntry>> {
    let mut entries = BTreeMap::new();

    for (kind, map) in [
        (StagedKind::Regular, &overridables.files),
        (StagedKind::Config, &overridables.config_files),
    ] {
        for (pattern, dest) in map {
            for (source, dest) in expand_glob(pattern, dest)? {
                let metadata = std::fs::metadata(&source)?;
                insert_entry(
                    &mut entries,
                    StagedEntry {
                        mode: file_mode(&metadata),
                        size: metadata.len(),
                        source: Some(source),
                        dest,
                        kind: kind.clone(),
                    },
                )?;
            }
        }
    }

    for (target, dest) in &overridables.symlinks {
        insert_entry(
            &mut entries,
            StagedEntry {
                source: None,
                dest: dest.clone(),
                kind: StagedKind::Symlink(target.clone()),
                mode: 0o777,
                size: 0,
            },
        )?;
    }

    for dest in &overridables.empty_folders {
        insert_entry(
            &mut entries,
            StagedEntry {
                source: None,
                dest: dest.clone(),
                kind: StagedKind::Dir,
                mode: 0o755,
                size: 0,
            },
        )?;
    }

    Ok(entries.into_values().collect())
}

/// Total installed bytes across content-carrying entries.
pub fn installed_size(entries: &[StagedEntry]) -> u64 {
    entries
        .iter()
        .filter(|e| e.has_content())
        .map(|e| e.size)
        .sum()
}

/// The ancestor directories a destination path requires, shallowest first.
///
/// The root directory is never part of the result, and neither is the
/// final path component itself: `/usr/share/doc/x/foo.md` yields
/// `usr`, `usr/share`, `usr/share/doc`, `usr/share/doc/x`.
pub fn paths_to_create(dest: &str) -> Vec<String> {
    let components = dest
        .trim_matches('/')
        .split('/')
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>();

    let mut paths = vec![];
    for end in 1..components.len() {
        paths.push(components[..end].join("/"));
    }

    paths
}
