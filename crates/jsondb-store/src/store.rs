use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::lock::{self, LockRegistry};
use crate::names::{validate_collection, validate_resource};
use crate::paths;

/// Permission bits for created directories (unix).
pub const DIR_MODE: u32 = 0o755;
/// Permission bits for created document files (unix).
pub const FILE_MODE: u32 = 0o644;

/// Filesystem-backed JSON document store.
///
/// Documents live at `<root>/<collection>/<resource>.json`. Writes and
/// deletes take the collection's lock from the [`LockRegistry`]; reads take
/// no lock and rely on writes being committed by an atomic rename, so a
/// reader sees either the previous or the new complete document.
///
/// Locking is in-process only. Two processes sharing a root are not
/// coordinated.
pub struct RecordStore {
    root: PathBuf,
    config: StoreConfig,
    locks: LockRegistry,
}

impl RecordStore {
    /// Open the store at `root` with default settings.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with(StoreConfig::new(root))
    }

    /// Open the store described by `config`.
    ///
    /// An existing directory is used as-is. A missing one is created along
    /// with any missing parents.
    pub fn open_with(config: StoreConfig) -> StoreResult<Self> {
        let root = paths::normalize(&config.root).map_err(|e| StoreError::io(&config.root, e))?;

        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => {
                debug!(root = %root.display(), "using existing database");
            }
            Ok(_) => {
                return Err(StoreError::Io {
                    path: root,
                    source: io::Error::other("database root exists and is not a directory"),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "creating database");
                create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
            }
            Err(e) => return Err(StoreError::io(&root, e)),
        }

        Ok(Self {
            root,
            config,
            locks: LockRegistry::new(),
        })
    }

    /// Normalized absolute root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The per-collection lock registry shared by writes and deletes.
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Store `value` as `<collection>/<resource>.json`, replacing any
    /// previous version.
    ///
    /// The document is staged in `<resource>.json.tmp` and renamed into
    /// place. On any failure the previous version is left untouched.
    pub fn write<T>(&self, collection: &str, resource: &str, value: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        validate_collection(collection)?;
        validate_resource(resource)?;
        let bytes = encode(value)?;

        let collection_lock = self.locks.get_or_create(collection);
        let _guard = lock::acquire(&collection_lock);

        let dir = paths::collection_dir(&self.root, collection);
        create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let document = paths::with_document_ext(&paths::resource_path(&self.root, collection, resource));
        let staged = paths::staging_path(&document);

        if let Err(e) = self.stage(&staged, &bytes) {
            discard(&staged);
            return Err(StoreError::io(&staged, e));
        }
        if let Err(e) = fs::rename(&staged, &document) {
            discard(&staged);
            return Err(StoreError::io(&document, e));
        }
        if self.config.sync_writes {
            sync_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
        }

        debug!(collection, resource, len = bytes.len(), "wrote document");
        Ok(())
    }

    /// Remove `<collection>/<resource>`.
    ///
    /// If the resolved path is a directory the whole subtree is removed; an
    /// empty `resource` therefore deletes the entire collection. Otherwise
    /// `<resource>.json` is removed. Fails with [`StoreError::NotFound`] when
    /// nothing exists at the resolved location.
    pub fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        validate_collection(collection)?;
        if !resource.is_empty() {
            validate_resource(resource)?;
        }

        let collection_lock = self.locks.get_or_create(collection);
        let _guard = lock::acquire(&collection_lock);

        let target = if resource.is_empty() {
            paths::collection_dir(&self.root, collection)
        } else {
            paths::resource_path(&self.root, collection, resource)
        };

        let Some((matched, meta)) = paths::probe(&target).map_err(|e| StoreError::io(&target, e))?
        else {
            return Err(StoreError::NotFound { path: target });
        };

        if meta.is_dir() {
            fs::remove_dir_all(&matched).map_err(|e| StoreError::lookup(&matched, e))?;
            debug!(collection, resource, "deleted directory");
        } else {
            let document = paths::with_document_ext(&target);
            fs::remove_file(&document).map_err(|e| StoreError::lookup(&document, e))?;
            debug!(collection, resource, "deleted document");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Load `<collection>/<resource>.json` and decode it as `T`.
    ///
    /// The existence check accepts either `<resource>` or `<resource>.json`
    /// on disk; the decoded file is always `<resource>.json`.
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> StoreResult<T> {
        validate_collection(collection)?;
        validate_resource(resource)?;

        let bare = paths::resource_path(&self.root, collection, resource);
        if paths::probe(&bare).map_err(|e| StoreError::io(&bare, e))?.is_none() {
            return Err(StoreError::NotFound { path: bare });
        }

        let document = paths::with_document_ext(&bare);
        let bytes = fs::read(&document).map_err(|e| StoreError::lookup(&document, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::decode(&document, e))
    }

    /// Raw JSON text of every document in `collection`, in directory listing
    /// order.
    ///
    /// Staged `*.json.tmp` files are skipped. The first unreadable entry
    /// aborts the call.
    pub fn read_all(&self, collection: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .read_entries(collection)?
            .into_iter()
            .map(|(_, text)| text)
            .collect())
    }

    /// [`read_all`](Self::read_all), then decode every document as `T`.
    pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        self.read_entries(collection)?
            .into_iter()
            .map(|(path, text)| serde_json::from_str(&text).map_err(|e| StoreError::decode(&path, e)))
            .collect()
    }

    fn read_entries(&self, collection: &str) -> StoreResult<Vec<(PathBuf, String)>> {
        validate_collection(collection)?;

        let dir = paths::collection_dir(&self.root, collection);
        if paths::probe(&dir).map_err(|e| StoreError::io(&dir, e))?.is_none() {
            return Err(StoreError::NotFound { path: dir });
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| StoreError::lookup(&dir, e))? {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            if paths::is_staging_file(&entry.file_name()) {
                continue;
            }
            let path = entry.path();
            let text = fs::read_to_string(&path).map_err(|e| StoreError::lookup(&path, e))?;
            records.push((path, text));
        }
        Ok(records)
    }

    fn stage(&self, staged: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }

        let mut file = options.open(staged)?;
        file.write_all(bytes)?;
        if self.config.sync_writes {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("root", &self.root)
            .field("sync_writes", &self.config.sync_writes)
            .field("collections_locked", &self.locks.len())
            .finish()
    }
}

/// Tab-indented JSON with a trailing newline. Struct fields keep their
/// declaration order.
fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

fn create_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Best-effort removal of a staged file after a failed write.
fn discard(staged: &Path) {
    match fs::remove_file(staged) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %staged.display(), error = %e, "failed to remove staged file"),
    }
}
