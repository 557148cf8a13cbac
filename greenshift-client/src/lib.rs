use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

mod error;
mod http_client;

pub use error::ClientError;
pub use http_client::GreenShiftClient;

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub points: i32,
    pub level: String,
    pub completed_actions: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub analysis: String,
    pub status: String,
    pub vendor: VendorSummary,
    pub created_at: DateTime<Utc>,
}
