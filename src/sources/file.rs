use std::{fs, path::Path, sync::Arc, time::SystemTime};

use tracing::instrument;

use crate::{
    ConfigStoreError, Item, Result, Store,
    decode::{Decoder, default_decoder},
    providers::{InMemoryProvider, ProviderKind},
};

impl Store {
    /// Registers the items of a YAML file under `file:<path>`.
    ///
    /// An empty path is ignored. A file that cannot be read or decoded is
    /// registered as an error provider.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.file(path.as_ref(), false, None);
    }

    /// Like [`Store::add_file`], and keeps polling the file for changes.
    ///
    /// Polling needs a tokio runtime; without one the file is registered
    /// without refresh and a diagnostic is emitted.
    pub fn add_file_refresh(&self, path: impl AsRef<Path>) {
        self.file(path.as_ref(), true, None);
    }

    /// Registers the items of a file decoded by `decoder`.
    pub fn add_file_custom(&self, path: impl AsRef<Path>, decoder: Decoder) {
        self.file(path.as_ref(), false, Some(decoder));
    }

    /// Like [`Store::add_file_custom`], and keeps polling the file for changes.
    pub fn add_file_custom_refresh(&self, path: impl AsRef<Path>, decoder: Decoder) {
        self.file(path.as_ref(), true, Some(decoder));
    }

    #[instrument(skip(self, decoder), fields(path = %path.display()))]
    pub(super) fn file(&self, path: &Path, refresh: bool, decoder: Option<Decoder>) {
        if path.as_os_str().is_empty() {
            return;
        }

        let name = format!("file:{}", path.display());
        let decoder = decoder.unwrap_or_else(default_decoder);

        // Taken before reading, so a write racing the first read is picked up
        // by the first refresh tick.
        let loaded_at = SystemTime::now();
        let items = match read_items(path, &decoder) {
            Ok(items) => items,
            Err(error) => {
                self.register_error(name, error);
                return;
            }
        };

        let backing = InMemoryProvider::new();
        backing.add(items);
        self.register_with_kind(name.clone(), ProviderKind::File, Arc::new(backing.clone()));
        self.diagnostics()
            .info(&format!("configuration from file: {}", path.display()));

        if refresh {
            self.start_refresh(name, path.to_path_buf(), decoder, backing, loaded_at);
        }
    }
}

/// Reads `path` and decodes its contents.
///
/// # Errors
/// * `ConfigStoreError::IoError` - If the file cannot be read
/// * Whatever `decoder` returns for content it rejects
pub(super) fn read_items(path: &Path, decoder: &Decoder) -> Result<Vec<Item>> {
    let bytes = fs::read(path).map_err(|e| ConfigStoreError::io(e, path))?;
    decoder(&bytes)
}
