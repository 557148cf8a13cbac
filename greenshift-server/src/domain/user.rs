use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Individual,
    Hostel,
    Company,
    Vendor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Individual => "individual",
            UserRole::Hostel => "hostel",
            UserRole::Company => "company",
            UserRole::Vendor => "vendor",
        }
    }

    /// Parses a role submitted at the registration boundary. Anything outside
    /// the closed set is a validation error, not a default.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "individual" => Ok(UserRole::Individual),
            "hostel" => Ok(UserRole::Hostel),
            "company" => Ok(UserRole::Company),
            "vendor" => Ok(UserRole::Vendor),
            other => Err(DomainError::Validation(format!(
                "unknown user type: {}",
                other
            ))),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Seedling,
    Sapling,
    Tree,
    Forest,
}

impl Level {
    pub fn for_points(points: i32) -> Self {
        match points {
            i32::MIN..=99 => Level::Seedling,
            100..=499 => Level::Sapling,
            500..=1499 => Level::Tree,
            _ => Level::Forest,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub points: i32,
    pub level: Level,
    pub completed_actions: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            points: 0,
            level: Level::for_points(0),
            completed_actions: 0,
            created_at: Utc::now(),
        }
    }
}
