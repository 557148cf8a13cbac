use crate::domain::error::DomainError;
use crate::domain::product::{ListingWithVendor, Product};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

const LISTING_COLUMNS: &str = r#"
    p.id, p.name, p.description, p.price, p.image_path, p.analysis, p.status, p.created_at,
    u.id AS vendor_id, u.name AS vendor_name
"#;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> Result<Product, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ListingWithVendor>, DomainError>;
    /// All listings in creation order, each joined with its vendor's public fields.
    async fn list_all(&self) -> Result<Vec<ListingWithVendor>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, vendor_id, name, description, price, image_path, analysis, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.id)
        .bind(product.vendor_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_path)
        .bind(&product.analysis)
        .bind(product.status)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create product: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(product_id = %product.id, vendor_id = %product.vendor_id, "product created");
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ListingWithVendor>, DomainError> {
        sqlx::query_as::<_, ListingWithVendor>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM products p
            JOIN users u ON u.id = p.vendor_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find product {}: {}", id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn list_all(&self) -> Result<Vec<ListingWithVendor>, DomainError> {
        sqlx::query_as::<_, ListingWithVendor>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM products p
            JOIN users u ON u.id = p.vendor_id
            ORDER BY p.created_at ASC, p.id
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to list products: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }
}
