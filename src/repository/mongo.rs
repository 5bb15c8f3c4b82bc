//! MongoDB brand repository
//!
//! One `Client` is created at startup and shared by every request; the driver
//! pools connections internally.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::{BrandRepository, RepositoryError, Result};
use crate::config::DatabaseConfig;
use crate::model::{Brand, BrandId};

/// Stored shape of a brand
///
/// Text fields may be missing or `null` in existing documents; both read as
/// empty.
#[derive(Debug, Serialize, Deserialize)]
struct BrandDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<BrandDocument> for Brand {
    fn from(doc: BrandDocument) -> Self {
        Self {
            id: BrandId::new(doc.id.to_hex()),
            name: doc.name.unwrap_or_default(),
            description: doc.description.unwrap_or_default(),
        }
    }
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Store(err.to_string())
    }
}

pub struct MongoBrandRepository {
    database: Database,
    brands: Collection<BrandDocument>,
}

impl MongoBrandRepository {
    /// Build the client from the configured connection string.
    ///
    /// The driver connects lazily; call [`BrandRepository::ping`] to verify
    /// the server is reachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.name);
        let brands = database.collection::<BrandDocument>(&config.collection);
        Ok(Self { database, brands })
    }
}

/// A malformed id cannot name any document, so it is reported as not found.
fn parse_object_id(id: &BrandId) -> Result<ObjectId> {
    ObjectId::parse_str(id.as_str()).map_err(|_| RepositoryError::NotFound(id.to_string()))
}

#[async_trait]
impl BrandRepository for MongoBrandRepository {
    async fn list_all(&self) -> Result<Vec<Brand>> {
        let cursor = self.brands.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        let docs: Vec<BrandDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Brand::from).collect())
    }

    async fn get_by_id(&self, id: &BrandId) -> Result<Brand> {
        let oid = parse_object_id(id)?;
        self.brands
            .find_one(doc! { "_id": oid })
            .await?
            .map(Brand::from)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn create(&self, name: &str, description: &str) -> Result<Brand> {
        let doc = BrandDocument {
            id: ObjectId::new(),
            name: Some(name.to_string()),
            description: Some(description.to_string()),
        };
        self.brands.insert_one(&doc).await?;
        Ok(doc.into())
    }

    async fn update_by_id(&self, id: &BrandId, name: &str, description: &str) -> Result<()> {
        let oid = parse_object_id(id)?;
        let result = self
            .brands
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "name": name, "description": description } },
            )
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &BrandId) -> Result<()> {
        let oid = parse_object_id(id)?;
        let result = self.brands.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_document_to_brand_uses_hex_id() {
        let oid = ObjectId::new();
        let brand = Brand::from(BrandDocument {
            id: oid,
            name: Some("Acme".to_string()),
            description: Some("Widgets".to_string()),
        });
        assert_eq!(brand.id.as_str(), oid.to_hex());
        assert_eq!(brand.id.as_str().len(), 24);
    }

    #[test]
    fn test_null_or_missing_fields_read_as_empty() {
        let oid = ObjectId::new();

        let with_null: BrandDocument = mongodb::bson::from_document(
            doc! { "_id": oid, "name": Bson::Null, "description": "Widgets" },
        )
        .unwrap();
        let brand = Brand::from(with_null);
        assert_eq!(brand.name, "");
        assert_eq!(brand.description, "Widgets");

        let without_fields: BrandDocument =
            mongodb::bson::from_document(doc! { "_id": oid }).unwrap();
        let brand = Brand::from(without_fields);
        assert_eq!(brand.name, "");
        assert_eq!(brand.description, "");
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = parse_object_id(&BrandId::new("not-an-object-id")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(id) if id == "not-an-object-id"));

        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&BrandId::new(oid.to_hex())).unwrap(), oid);
    }

    #[tokio::test]
    async fn test_malformed_id_skips_store_round_trip() {
        // Client creation does not contact the server.
        let repo = MongoBrandRepository::connect(&DatabaseConfig {
            backend: crate::config::StoreBackend::Mongo,
            uri: "mongodb://127.0.0.1:1".to_string(),
            name: "branddb".to_string(),
            collection: "brands".to_string(),
        })
        .await
        .unwrap();

        let id = BrandId::new("xyz");
        assert!(matches!(repo.get_by_id(&id).await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(repo.delete_by_id(&id).await, Err(RepositoryError::NotFound(_))));
    }

    /// Needs a running server: `BRAND_TEST_MONGO_URI=mongodb://localhost:27017
    /// cargo test -- --ignored`
    #[tokio::test]
    #[ignore = "requires a live MongoDB at BRAND_TEST_MONGO_URI"]
    async fn test_live_store_update_delete_and_not_found() {
        let Ok(uri) = std::env::var("BRAND_TEST_MONGO_URI") else {
            return;
        };
        let repo = MongoBrandRepository::connect(&DatabaseConfig {
            backend: crate::config::StoreBackend::Mongo,
            uri,
            name: "branddb_test".to_string(),
            collection: format!("brands_{}", ObjectId::new().to_hex()),
        })
        .await
        .unwrap();
        repo.ping().await.unwrap();

        let created = repo.create("Acme", "Widgets").await.unwrap();
        repo.update_by_id(&created.id, "Acme Corp", "").await.unwrap();
        let updated = repo.get_by_id(&created.id).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Acme Corp");
        assert_eq!(updated.description, "");

        let missing = BrandId::new(ObjectId::new().to_hex());
        assert!(matches!(
            repo.update_by_id(&missing, "x", "y").await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_by_id(&missing).await,
            Err(RepositoryError::NotFound(_))
        ));

        repo.delete_by_id(&created.id).await.unwrap();
        assert!(matches!(
            repo.get_by_id(&created.id).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(repo.list_all().await.unwrap().is_empty());
        repo.brands.drop().await.unwrap();
    }
}
