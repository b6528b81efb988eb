//! Flat directory listing and entry moves.
//!
//! Rotation only ever looks one level deep: the files in the log directory
//! and the dated directories in the backup root.

use nix::errno::Errno;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// An entry found directly under a listed directory
#[derive(Debug, Clone)]
pub struct EntryInfo {
    /// Full path to the entry
    pub path: PathBuf,

    /// File name, lossily converted
    pub name: String,

    /// Is this a directory? Symlinks are not followed.
    pub is_dir: bool,

    /// Last modification time
    pub modified: SystemTime,
}

impl EntryInfo {
    fn from_entry(entry: &DirEntry) -> io::Result<Self> {
        let metadata = entry.metadata()?;
        Ok(Self {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            modified: metadata.modified()?,
        })
    }
}

/// List the direct children of `root`, sorted by name.
///
/// With a `keyword`, only entries whose name contains it are returned.
/// This is a plain substring test, not a glob.
///
/// # Example
/// ```no_run
/// use log_rotate::fs::listing::list_entries;
/// use std::path::Path;
///
/// let logs = list_entries(Path::new("/var/log/nginx"), Some("access")).unwrap();
/// println!("Found {} access logs", logs.len());
/// ```
pub fn list_entries(root: &Path, keyword: Option<&str>) -> io::Result<Vec<EntryInfo>> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry?;

        if !matches_keyword(&entry, keyword) {
            continue;
        }

        entries.push(EntryInfo::from_entry(&entry)?);
    }

    Ok(entries)
}

fn matches_keyword(entry: &DirEntry, keyword: Option<&str>) -> bool {
    match keyword {
        Some(keyword) => entry.file_name().to_string_lossy().contains(keyword),
        None => true,
    }
}

/// Move `src` to `dest`, like `mv`.
///
/// Tries a rename first. Only when the rename crosses file systems is the
/// entry copied and the original removed; every other error is returned.
pub fn move_entry(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => return Ok(()),
        Err(e) if e.raw_os_error() != Some(Errno::EXDEV as i32) => return Err(e),
        Err(_) => {}
    }

    let metadata = fs::symlink_metadata(src)?;

    if metadata.is_dir() {
        copy_tree(src, dest)?;
        fs::remove_dir_all(src)
    } else {
        fs::copy(src, dest)?;
        fs::remove_file(src)
    }
}

/// Recursively copy the directory `src` to `dest`.
fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Remove `path`; directories are removed with their contents.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
