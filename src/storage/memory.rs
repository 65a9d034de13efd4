//! In-memory object store for tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::storage::{ObjectHandle, ObjectStore, StorageError};

struct StoredObject {
    bytes: Vec<u8>,
    metadata: HashMap<String, String>,
}

/// Concurrency-safe in-memory [`ObjectStore`].
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    fail_metadata_writes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `set_metadata` calls fail, leaving uploads intact.
    /// Reproduces the upload-succeeded/metadata-missing inconsistency window.
    pub fn fail_metadata_writes(&self, fail: bool) {
        self.fail_metadata_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<ObjectHandle, StorageError> {
        let key = Uuid::new_v4().to_string();
        self.objects.write().await.insert(
            key.clone(),
            StoredObject {
                bytes,
                metadata: HashMap::new(),
            },
        );
        Ok(ObjectHandle { key })
    }

    async fn set_metadata(
        &self,
        handle: &ObjectHandle,
        metadata: HashMap<String, String>,
    ) -> Result<(), StorageError> {
        if self.fail_metadata_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "metadata writes disabled".to_string(),
            ));
        }
        let mut objects = self.objects.write().await;
        let object = objects
            .get_mut(&handle.key)
            .ok_or_else(|| StorageError::NotFound(handle.key.clone()))?;
        object.metadata = metadata;
        Ok(())
    }

    async fn get_metadata(
        &self,
        handle: &ObjectHandle,
    ) -> Result<HashMap<String, String>, StorageError> {
        let objects = self.objects.read().await;
        let object = objects
            .get(&handle.key)
            .ok_or_else(|| StorageError::NotFound(handle.key.clone()))?;
        Ok(object.metadata.clone())
    }
}
