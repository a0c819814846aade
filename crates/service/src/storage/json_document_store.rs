use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use models::{Entity, EntityId};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::repository::Repository;

/// Document store holding a whole collection in memory.
///
/// When opened with a path the collection is mirrored to that file as a JSON
/// array, rewritten after every save. Without a path it is purely in-memory
/// and forgets everything when dropped.
pub struct JsonDocumentStore<T> {
    inner: RwLock<Vec<T>>,
    file_path: Option<PathBuf>,
}

impl<T: Entity> JsonDocumentStore<T> {
    /// Empty store with no backing file.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(Vec::new()), file_path: None })
    }

    /// Open the store at `path`, creating the file with an empty collection if
    /// missing. A file that is not a JSON array of documents is an error.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let (docs, dirty) = match fs::read(&file_path).await {
            Ok(bytes) => load(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => (Vec::new(), true),
            Err(e) => return Err(e.into()),
        };
        if dirty {
            write_file(&file_path, &docs).await?;
        }
        info!(path = %file_path.display(), count = docs.len(), collection = T::COLLECTION, "opened json document store");

        Ok(Arc::new(Self { inner: RwLock::new(docs), file_path: Some(file_path) }))
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

/// Parse a stored collection. Documents missing an id are given one and later
/// duplicates of an id replace earlier ones; either case marks the file for
/// rewriting.
fn load<T: Entity>(bytes: &[u8]) -> Result<(Vec<T>, bool), ServiceError> {
    let raw: Vec<T> = serde_json::from_slice(bytes).map_err(models::errors::ModelError::from)?;
    let mut docs: Vec<T> = Vec::with_capacity(raw.len());
    let mut dirty = false;
    for mut doc in raw {
        if doc.id().is_none() {
            doc.set_id(T::Id::generate());
            dirty = true;
        }
        match docs.iter().position(|d| d.id() == doc.id()) {
            Some(i) => {
                docs[i] = doc;
                dirty = true;
            }
            None => docs.push(doc),
        }
    }
    Ok((docs, dirty))
}

/// Write through a sibling temp file and rename, so a crash mid-write leaves
/// the previous contents intact.
async fn write_file<T: Entity>(path: &Path, docs: &[T]) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(docs).map_err(models::errors::ModelError::from)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, data).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        fs::remove_file(&tmp).await.ok();
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl<T: Entity> Repository<T, T::Id> for JsonDocumentStore<T> {
    async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
        let docs = self.inner.read().await;
        debug!(collection = T::COLLECTION, count = docs.len(), "find_all");
        Ok(docs.clone())
    }

    async fn save(&self, mut entity: T) -> Result<T, ServiceError> {
        if entity.id().is_none() {
            entity.set_id(T::Id::generate());
        }
        // held across the file write so the file never lags a newer save
        let mut docs = self.inner.write().await;
        let slot = docs.iter().position(|d| d.id() == entity.id());
        let previous = match slot {
            Some(i) => Some(std::mem::replace(&mut docs[i], entity.clone())),
            None => {
                docs.push(entity.clone());
                None
            }
        };
        if let Some(path) = &self.file_path {
            if let Err(e) = write_file(path, &docs).await {
                // keep memory in step with the file
                match (slot, previous) {
                    (Some(i), Some(prev)) => docs[i] = prev,
                    _ => {
                        docs.pop();
                    }
                }
                return Err(e);
            }
        }
        debug!(collection = T::COLLECTION, id = ?entity.id().map(ToString::to_string), "save");
        Ok(entity)
    }
}
