use crate::domain::product::{ListingWithVendor, ProductStatus};
use crate::domain::user::{Level, User, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub user_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Public projection of a user account. The credential hash never leaves the
/// domain layer.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub points: i32,
    pub level: Level,
    pub completed_actions: i32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            points: user.points,
            level: user.level,
            completed_actions: user.completed_actions,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VendorSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub analysis: String,
    pub status: ProductStatus,
    pub vendor: VendorSummary,
    pub created_at: DateTime<Utc>,
}

impl From<ListingWithVendor> for ProductResponse {
    fn from(listing: ListingWithVendor) -> Self {
        Self {
            id: listing.id,
            name: listing.name,
            description: listing.description,
            price: listing.price,
            image: listing.image_path,
            analysis: listing.analysis,
            status: listing.status,
            vendor: VendorSummary {
                id: listing.vendor_id,
                name: listing.vendor_name,
            },
            created_at: listing.created_at,
        }
    }
}
