use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use greenshift_server::data::oracle_client::AnalysisOracle;
use greenshift_server::data::product_repository::ProductRepository;
use greenshift_server::data::user_repository::UserRepository;
use greenshift_server::domain::error::DomainError;
use greenshift_server::domain::product::{ListingWithVendor, Product};
use greenshift_server::domain::user::User;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn user_name(&self, id: Uuid) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::EmailTaken);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryProductRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            users,
        }
    }

    pub fn count(&self) -> usize {
        self.products.lock().unwrap().len()
    }

    fn join(&self, product: &Product) -> Result<ListingWithVendor, DomainError> {
        let vendor_name = self
            .users
            .user_name(product.vendor_id)
            .ok_or_else(|| DomainError::Internal("vendor missing".into()))?;
        Ok(ListingWithVendor {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_path: product.image_path.clone(),
            analysis: product.analysis.clone(),
            status: product.status,
            created_at: product.created_at,
            vendor_id: product.vendor_id,
            vendor_name,
        })
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ListingWithVendor>, DomainError> {
        let products = self.products.lock().unwrap();
        products
            .iter()
            .find(|p| p.id == id)
            .map(|p| self.join(p))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<ListingWithVendor>, DomainError> {
        let products = self.products.lock().unwrap();
        products.iter().map(|p| self.join(p)).collect()
    }
}

pub const FIXED_VERDICT: &str = "Recyclable: Yes, Category: Plastic, Value: $0.50";

pub struct FixedOracle;

#[async_trait]
impl AnalysisOracle for FixedOracle {
    async fn analyze(
        &self,
        _image: &[u8],
        _content_type: &str,
        _name: &str,
        _description: &str,
    ) -> Result<String, DomainError> {
        Ok(FIXED_VERDICT.to_string())
    }
}

pub struct FailingOracle;

#[async_trait]
impl AnalysisOracle for FailingOracle {
    async fn analyze(
        &self,
        _image: &[u8],
        _content_type: &str,
        _name: &str,
        _description: &str,
    ) -> Result<String, DomainError> {
        Err(DomainError::OracleUnavailable)
    }
}

pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Builds a `multipart/form-data` payload by hand; the test client has no
/// multipart writer of its own.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
    (content_type, body)
}
