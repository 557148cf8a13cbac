use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Available,
    Sold,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_path: String,
    pub analysis: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        vendor_id: Uuid,
        name: String,
        description: String,
        price: f64,
        image_path: String,
        analysis: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vendor_id,
            name,
            description,
            price,
            image_path,
            analysis,
            status: ProductStatus::Available,
            created_at: Utc::now(),
        }
    }
}

/// A product row joined with the public fields of the vendor who created it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingWithVendor {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_path: String,
    pub analysis: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub vendor_id: Uuid,
    pub vendor_name: String,
}
