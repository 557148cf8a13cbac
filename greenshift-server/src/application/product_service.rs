use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::data::oracle_client::AnalysisOracle;
use crate::data::product_repository::ProductRepository;
use crate::domain::error::DomainError;
use crate::domain::product::{ListingWithVendor, Product};
use crate::infrastructure::storage::FileStore;

/// An image received from the multipart boundary, already fully buffered.
#[derive(Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    oracle: Arc<dyn AnalysisOracle>,
    store: FileStore,
}

impl ProductService {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        oracle: Arc<dyn AnalysisOracle>,
        store: FileStore,
    ) -> Self {
        Self {
            repo,
            oracle,
            store,
        }
    }

    pub async fn get_product(&self, id: Uuid) -> Result<ListingWithVendor, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ProductNotFound(id))
    }

    pub async fn list_products(&self) -> Result<Vec<ListingWithVendor>, DomainError> {
        self.repo.list_all().await
    }

    /// Stores the image, obtains the analysis verdict, then inserts the
    /// listing. The database write only happens after a successful analysis;
    /// on oracle failure the stored file is reclaimed and nothing persists.
    #[instrument(skip(self, image), fields(vendor_id = %vendor_id))]
    pub async fn create_listing(
        &self,
        vendor_id: Uuid,
        name: &str,
        description: &str,
        price: f64,
        image: ImageUpload,
    ) -> Result<ListingWithVendor, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("name must not be empty".into()));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(DomainError::Validation(
                "description must not be empty".into(),
            ));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::Validation(
                "price must be a non-negative number".into(),
            ));
        }
        if image.bytes.is_empty() {
            return Err(DomainError::Validation("file must not be empty".into()));
        }

        let stored_path = self.store.save(&image.file_name, &image.bytes).await?;

        let analysis = match self
            .oracle
            .analyze(&image.bytes, &image.content_type, name, description)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("analysis failed, reclaiming stored upload");
                self.store.remove(&stored_path).await;
                return Err(e);
            }
        };

        let product = self
            .repo
            .create(Product::new(
                vendor_id,
                name.to_string(),
                description.to_string(),
                price,
                stored_path,
                analysis,
            ))
            .await?;

        info!(product_id = %product.id, "listing created");

        self.repo
            .find_by_id(product.id)
            .await?
            .ok_or_else(|| DomainError::Internal("created listing vanished".into()))
    }
}
