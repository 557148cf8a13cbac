use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, get, post, web};
use tracing::info;
use uuid::Uuid;

use crate::application::product_service::{ImageUpload, ProductService};
use crate::domain::error::DomainError;
use crate::presentation::dto::ProductResponse;
use crate::presentation::utils::AuthenticatedVendor;

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    name: Option<Text<String>>,
    description: Option<Text<String>>,
    price: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    file: Option<TempFile>,
}

#[post("/upload")]
pub async fn upload_product(
    req: HttpRequest,
    vendor: AuthenticatedVendor,
    service: web::Data<ProductService>,
    form: MultipartForm<UploadForm>,
) -> Result<HttpResponse, DomainError> {
    let UploadForm {
        name,
        description,
        price,
        file,
    } = form.into_inner();

    let name = required_text(name, "name")?;
    let description = required_text(description, "description")?;
    let price: f64 = required_text(price, "price")?
        .trim()
        .parse()
        .map_err(|_| DomainError::Validation("price must be a number".into()))?;
    let file = file.ok_or_else(|| DomainError::Validation("file is required".into()))?;

    let content_type = file
        .content_type
        .as_ref()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".into());
    let file_name = file
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());
    let bytes = tokio::fs::read(file.file.path())
        .await
        .map_err(|e| DomainError::Internal(format!("failed to read upload: {}", e)))?;

    let listing = service
        .create_listing(
            vendor.0.id,
            &name,
            &description,
            price,
            ImageUpload {
                bytes,
                file_name,
                content_type,
            },
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        vendor = %vendor.0.name,
        product_id = %listing.id,
        "product uploaded"
    );

    Ok(HttpResponse::Created().json(ProductResponse::from(listing)))
}

#[get("")]
pub async fn list_products(
    req: HttpRequest,
    service: web::Data<ProductService>,
) -> Result<HttpResponse, DomainError> {
    let listings = service.list_products().await?;

    info!(
        request_id = %request_id(&req),
        count = listings.len(),
        "products retrieved"
    );

    let response: Vec<ProductResponse> = listings.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{id}")]
pub async fn get_product(
    service: web::Data<ProductService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| DomainError::Validation("invalid product id".into()))?;
    let listing = service.get_product(id).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(listing)))
}

fn required_text(field: Option<Text<String>>, name: &str) -> Result<String, DomainError> {
    field
        .map(|t| t.0)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DomainError::Validation(format!("{} is required", name)))
}

fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<crate::presentation::middleware::RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
