//! In-memory brand repository (for development/testing).

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{BrandRepository, RepositoryError, Result};
use crate::model::{Brand, BrandId};

/// Keeps brands in a vector so listing preserves insertion order.
#[derive(Default)]
pub struct InMemoryBrandRepository {
    brands: RwLock<Vec<Brand>>,
}

impl InMemoryBrandRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BrandRepository for InMemoryBrandRepository {
    async fn list_all(&self) -> Result<Vec<Brand>> {
        Ok(self.brands.read().await.clone())
    }

    async fn get_by_id(&self, id: &BrandId) -> Result<Brand> {
        self.brands
            .read()
            .await
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn create(&self, name: &str, description: &str) -> Result<Brand> {
        let brand = Brand {
            id: BrandId::new(ObjectId::new().to_hex()),
            name: name.to_string(),
            description: description.to_string(),
        };
        self.brands.write().await.push(brand.clone());
        Ok(brand)
    }

    async fn update_by_id(&self, id: &BrandId, name: &str, description: &str) -> Result<()> {
        let mut brands = self.brands.write().await;
        let brand = brands
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        brand.name = name.to_string();
        brand.description = description.to_string();
        Ok(())
    }

    async fn delete_by_id(&self, id: &BrandId) -> Result<()> {
        let mut brands = self.brands.write().await;
        let pos = brands
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        brands.remove(pos);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
