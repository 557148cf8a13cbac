use std::fs;
use std::path::Path;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use crate::error::ClientError;
use crate::{AuthResponse, Product, UserProfile};

const TOKEN_FILE: &str = ".greenshift_token";

#[derive(Clone)]
pub struct GreenShiftClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GreenShiftClient {
    pub fn connect(endpoint: &str) -> Result<Self, ClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token: None,
        })
    }

    fn set_token(&mut self, token: String) -> Result<(), ClientError> {
        fs::write(TOKEN_FILE, &token)?;
        self.token = Some(token);
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn auth_header(&self) -> Result<reqwest::header::HeaderValue, ClientError> {
        // Session token lives either on the client or in the dotfile a
        // previous login left behind.
        let token = match &self.token {
            Some(t) if !t.is_empty() => t.clone(),
            _ => {
                let t = fs::read_to_string(TOKEN_FILE)
                    .map_err(|_| ClientError::Unauthorized("not logged in".into()))?;
                t.trim().to_string()
            }
        };

        if token.is_empty() {
            return Err(ClientError::Unauthorized("not logged in".into()));
        }

        reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::Unauthorized("stored token is malformed".into()))
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        user_type: &str,
    ) -> Result<UserProfile, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/users/register", self.base_url))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
                "userType": user_type,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            let auth: AuthResponse = response.json().await?;
            self.set_token(auth.token)?;
            Ok(auth.user)
        } else {
            Err(ClientError::from_http_response(response).await)
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/users/login", self.base_url))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            let auth: AuthResponse = response.json().await?;
            self.set_token(auth.token)?;
            Ok(auth.user)
        } else {
            Err(ClientError::from_http_response(response).await)
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/products", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ClientError::from_http_response(response).await)
        }
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/products/{}", self.base_url, id))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ClientError::from_http_response(response).await)
        }
    }

    pub async fn upload_product(
        &self,
        name: &str,
        description: &str,
        price: f64,
        image: &Path,
    ) -> Result<Product, ClientError> {
        let bytes = tokio::fs::read(image).await?;
        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(guess_mime(image))?;

        let form = Form::new()
            .text("name", name.to_string())
            .text("description", description.to_string())
            .text("price", price.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/api/products/upload", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .multipart(form)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ClientError::from_http_response(response).await)
        }
    }
}

fn guess_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
