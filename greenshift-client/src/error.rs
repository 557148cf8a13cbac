use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not found")]
    NotFound,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// Folds a non-success response into a typed error, pulling the
    /// `{ "message": ... }` body the server attaches to every failure.
    pub async fn from_http_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| status.to_string());

        match status {
            reqwest::StatusCode::NOT_FOUND => ClientError::NotFound,
            reqwest::StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
