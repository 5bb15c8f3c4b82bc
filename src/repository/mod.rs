//! Brand repository
//!
//! Data access over the document store. Every operation is a single store
//! call; failures surface to the caller and are never retried.

mod memory;
mod mongo;

pub use memory::InMemoryBrandRepository;
pub use mongo::MongoBrandRepository;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Brand, BrandId};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("brand not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// All brands in insertion order.
    async fn list_all(&self) -> Result<Vec<Brand>>;

    async fn get_by_id(&self, id: &BrandId) -> Result<Brand>;

    /// Inserts a brand and returns it with its store-assigned id.
    async fn create(&self, name: &str, description: &str) -> Result<Brand>;

    /// Overwrites name and description. The id never changes.
    async fn update_by_id(&self, id: &BrandId, name: &str, description: &str) -> Result<()>;

    async fn delete_by_id(&self, id: &BrandId) -> Result<()>;

    /// Store round-trip used by the readiness probe.
    async fn ping(&self) -> Result<()>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
