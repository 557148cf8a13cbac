use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::domain::user::UserRole;
use crate::infrastructure::security::JwtKeys;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(
                DomainError::Unauthorized("missing authenticated user".into()).into(),
            )),
        }
    }
}

/// Vendor gate for write endpoints. Resolves before the handler body runs, so
/// a non-vendor request is rejected before the upload payload is touched.
#[derive(Debug, Clone)]
pub struct AuthenticatedVendor(pub AuthenticatedUser);

impl FromRequest for AuthenticatedVendor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthenticatedUser>() {
            Some(user) if user.role == UserRole::Vendor => Ok(AuthenticatedVendor(user.clone())),
            Some(_) => Err(DomainError::NotVendor.into()),
            None => Err(DomainError::Unauthorized("missing authenticated user".into()).into()),
        };
        ready(result)
    }
}

pub async fn extract_user_from_token(
    token: &str,
    keys: &JwtKeys,
    auth_service: &AuthService,
) -> Result<AuthenticatedUser, DomainError> {
    let claims = keys
        .verify_token(token)
        .map_err(|_| DomainError::Unauthorized("invalid token".into()))?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| DomainError::Unauthorized("invalid token".into()))?;

    let user = auth_service
        .get_user(user_id)
        .await
        .map_err(|_| DomainError::Unauthorized("user not found".into()))?;

    Ok(AuthenticatedUser {
        id: user.id,
        name: user.name,
        role: user.role,
    })
}
