//! Object store collaborator.
//!
//! # Responsibilities
//! - Narrow interface to the external object store: upload, metadata write,
//!   metadata read
//!
//! # Design Decisions
//! - Failures surface as `StorageError`; no retry or backoff in this layer,
//!   that policy belongs to the store itself
//! - The in-memory implementation is concurrency-safe and models the window
//!   where an object exists but its metadata write has not landed

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

mod memory;

pub use memory::MemoryObjectStore;

/// Opaque reference to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub key: String,
}

/// Object store failure, surfaced to the caller unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// External object store, already concurrent-safe on its side.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload an object, returning a handle to it.
    async fn upload(&self, bytes: Vec<u8>) -> Result<ObjectHandle, StorageError>;

    /// Replace the object's metadata set.
    async fn set_metadata(
        &self,
        handle: &ObjectHandle,
        metadata: HashMap<String, String>,
    ) -> Result<(), StorageError>;

    /// Read the object's metadata set. Empty if none was ever written.
    async fn get_metadata(
        &self,
        handle: &ObjectHandle,
    ) -> Result<HashMap<String, String>, StorageError>;
}
