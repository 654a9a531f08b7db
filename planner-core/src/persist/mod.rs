//! Disk persistence for build-once caches.
//!
//! A cache that can be persisted implements [`Cacheable`]: it flattens itself
//! into an ordered list of records and rebuilds itself from the same list.
//! [`DataCache`] owns the cache directory and writes one file per cache,
//! encoded with the configured [`RecordCodec`].
//!
//! Freshness is not checked here. Whoever loads a cache must validate it
//! against live data and discard it on mismatch (see [`crate::startup`]).

mod codec;
mod error;

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub use codec::RecordCodec;
pub use error::PersistError;

/// A structure that can be saved as, and rebuilt from, flat records.
pub trait Cacheable: Sized {
    /// One persisted row.
    type Record: Serialize + DeserializeOwned;

    /// File stem for this cache, unique within a cache directory.
    const CACHE_NAME: &'static str;

    /// Append every record describing `self` to `sink`, in order.
    fn cache_to(&self, sink: &mut Vec<Self::Record>);

    /// Rebuild from records previously produced by [`Cacheable::cache_to`].
    fn load_from(records: Vec<Self::Record>) -> Result<Self, PersistError>;
}

/// A directory of persisted caches.
#[derive(Debug, Clone)]
pub struct DataCache {
    dir: PathBuf,
    codec: RecordCodec,
}

impl DataCache {
    pub fn new(dir: impl Into<PathBuf>, codec: RecordCodec) -> Self {
        Self {
            dir: dir.into(),
            codec,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn codec(&self) -> RecordCodec {
        self.codec
    }

    /// Path of the file holding cache `T`.
    pub fn path_for<T: Cacheable>(&self) -> PathBuf {
        self.dir
            .join(format!("{}.{}", T::CACHE_NAME, self.codec.extension()))
    }

    /// True if a file for cache `T` exists.
    pub fn has<T: Cacheable>(&self) -> bool {
        self.path_for::<T>().is_file()
    }

    /// Save `item`, replacing any existing file.
    ///
    /// Creates the cache directory if it doesn't exist.
    pub fn save<T: Cacheable>(&self, item: &T) -> Result<(), PersistError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| PersistError::io(&self.dir, e))?;
        }

        let mut records = Vec::new();
        item.cache_to(&mut records);

        let path = self.path_for::<T>();
        let file = File::create(&path).map_err(|e| PersistError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        self.codec.write_records(&mut writer, &records)?;
        writer.flush().map_err(|e| PersistError::io(&path, e))?;

        info!(
            cache = T::CACHE_NAME,
            records = records.len(),
            path = %path.display(),
            "Saved cache"
        );
        Ok(())
    }

    /// Load cache `T`.
    ///
    /// Returns `Ok(None)` if no file exists; decoding failures and invalid
    /// content are errors.
    pub fn load<T: Cacheable>(&self) -> Result<Option<T>, PersistError> {
        let path = self.path_for::<T>();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(cache = T::CACHE_NAME, path = %path.display(), "No cache file");
                return Ok(None);
            }
            Err(e) => return Err(PersistError::io(&path, e)),
        };

        let records: Vec<T::Record> = self.codec.read_records(BufReader::new(file))?;
        let count = records.len();
        let item = T::load_from(records)?;

        info!(cache = T::CACHE_NAME, records = count, "Loaded cache");
        Ok(Some(item))
    }

    /// Delete the file for cache `T`, if present.
    pub fn remove<T: Cacheable>(&self) -> Result<(), PersistError> {
        let path = self.path_for::<T>();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(cache = T::CACHE_NAME, "Removed cache file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::io(&path, e)),
        }
    }
}
