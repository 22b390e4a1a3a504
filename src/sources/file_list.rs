use std::{
    fs::{self, DirEntry},
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::{ConfigStoreError, Store, decode::Decoder};

impl Store {
    /// Registers every regular file directly inside `dir`.
    ///
    /// Files are registered one provider each, in file-name order, without
    /// refresh. Subdirectories are skipped; symlinks are followed one level and
    /// skipped when they point at a directory. If the directory cannot be
    /// listed, or a symlink cannot be resolved, an error provider named
    /// `filelist:<dir>` is registered and the remaining entries are skipped.
    /// Files registered before the failing entry stay registered.
    pub fn add_file_list(&self, dir: impl AsRef<Path>) {
        self.file_list(dir.as_ref(), None);
    }

    /// Like [`Store::add_file_list`], decoding every file with `decoder`.
    pub fn add_file_list_custom(&self, dir: impl AsRef<Path>, decoder: Decoder) {
        self.file_list(dir.as_ref(), Some(decoder));
    }

    #[instrument(skip(self, decoder), fields(dir = %dir.display()))]
    fn file_list(&self, dir: &Path, decoder: Option<Decoder>) {
        if dir.as_os_str().is_empty() {
            return;
        }

        let name = format!("filelist:{}", dir.display());

        let entries = match sorted_entries(dir) {
            Ok(entries) => entries,
            Err(error) => {
                self.register_error(name, error);
                return;
            }
        };

        debug!(entries = entries.len(), "walking directory entries");
        for entry in entries {
            match source_path(dir, &entry) {
                Ok(Some(path)) => self.file(&path, false, decoder.clone()),
                Ok(None) => {}
                Err(error) => {
                    self.register_error(name, error);
                    return;
                }
            }
        }
    }
}

/// Lists the entries of `dir`, sorted by file name.
fn sorted_entries(dir: &Path) -> Result<Vec<DirEntry>, ConfigStoreError> {
    let mut entries = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
        .map_err(|e| list_error(dir, e))?;
    entries.sort_by_key(DirEntry::file_name);

    Ok(entries)
}

/// The path to register for `entry`, or `None` when it names a directory.
fn source_path(dir: &Path, entry: &DirEntry) -> Result<Option<PathBuf>, ConfigStoreError> {
    let path = entry.path();
    let file_type = entry.file_type().map_err(|e| list_error(dir, e))?;

    if file_type.is_dir() {
        return Ok(None);
    }

    if file_type.is_symlink() {
        let target = fs::metadata(&path).map_err(|e| ConfigStoreError::SymlinkError {
            path: path.clone(),
            details: e.to_string(),
        })?;

        if target.is_dir() {
            return Ok(None);
        }
    }

    Ok(Some(path))
}

fn list_error(dir: &Path, e: io::Error) -> ConfigStoreError {
    ConfigStoreError::DirectoryListError {
        path: dir.to_path_buf(),
        details: e.to_string(),
    }
}
