mod support;

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test as actix_test, web};
use serde_json::{Value, json};

use greenshift_server::application::auth_service::AuthService;
use greenshift_server::application::product_service::ProductService;
use greenshift_server::data::oracle_client::AnalysisOracle;
use greenshift_server::domain::error::DomainError;
use greenshift_server::infrastructure::security::JwtKeys;
use greenshift_server::infrastructure::storage::FileStore;
use greenshift_server::presentation::handlers;
use greenshift_server::presentation::middleware::JwtAuthMiddleware;

use support::{
    FIXED_VERDICT, FailingOracle, FixedOracle, InMemoryProductRepository, InMemoryUserRepository,
    multipart_body,
};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01];

struct Harness {
    products: Arc<InMemoryProductRepository>,
    upload_dir: tempfile::TempDir,
    auth: AuthService,
    product: ProductService,
}

async fn harness(oracle: Arc<dyn AnalysisOracle>) -> Harness {
    let users = Arc::new(InMemoryUserRepository::default());
    let products = Arc::new(InMemoryProductRepository::new(Arc::clone(&users)));
    let upload_dir = tempfile::tempdir().unwrap();
    let store = FileStore::init(upload_dir.path()).await.unwrap();

    let auth = AuthService::new(users.clone(), JwtKeys::new("integration-secret".into()));
    let product = ProductService::new(products.clone(), oracle, store);

    Harness {
        products,
        upload_dir,
        auth,
        product,
    }
}

fn test_app(
    harness: &Harness,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _| DomainError::Validation(err.to_string()).into()),
        )
        .app_data(
            actix_multipart::form::MultipartFormConfig::default()
                .error_handler(|err, _| DomainError::Validation(err.to_string()).into()),
        )
        .app_data(web::Data::new(harness.auth.clone()))
        .app_data(web::Data::new(harness.product.clone()))
        .service(
            web::scope("/api")
                .service(handlers::auth::scope())
                .service(
                    web::scope("/products")
                        .wrap(JwtAuthMiddleware::new(harness.auth.keys().clone()))
                        .service(handlers::product::upload_product)
                        .service(handlers::product::list_products)
                        .service(handlers::product::get_product),
                ),
        )
}

async fn register(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    user_type: &str,
) -> (StatusCode, Value) {
    let request = actix_test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": "hunter2hunter2",
            "userType": user_type,
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

fn token_of(body: &Value) -> String {
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in response")
        .to_string()
}

fn upload_request(
    token: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> actix_http::Request {
    let (content_type, body) = multipart_body(fields, file);
    actix_test::TestRequest::post()
        .uri("/api/products/upload")
        .insert_header(("authorization", format!("Bearer {}", token)))
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request()
}

fn stored_upload_count(harness: &Harness) -> usize {
    std::fs::read_dir(harness.upload_dir.path()).unwrap().count()
}

const PRODUCT_FIELDS: &[(&str, &str)] = &[
    ("name", "Test Plastic Bottle"),
    ("description", "A clear plastic bottle."),
    ("price", "0.50"),
];

#[actix_web::test]
async fn register_returns_token_and_public_profile() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (status, body) = register(&app, "Vera", "Vera@Example.com", "vendor").await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!token_of(&body).is_empty());
    let user = body.get("user").expect("user in response");
    assert_eq!(user["name"], json!("Vera"));
    assert_eq!(user["email"], json!("vera@example.com"));
    assert_eq!(user["role"], json!("vendor"));
    assert_eq!(user["points"], json!(0));
    assert_eq!(user["level"], json!("seedling"));
    assert!(user.get("password_hash").is_none());
}

#[actix_web::test]
async fn register_rejects_unknown_user_type() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (status, body) = register(&app, "Eve", "eve@example.com", "admin").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("unknown user type: admin"));
}

#[actix_web::test]
async fn duplicate_email_conflicts_and_first_account_survives() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (first, _) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    assert_eq!(first, StatusCode::CREATED);

    let (second, body) = register(&app, "Mallory", "vendor@example.com", "individual").await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["message"], json!("email already registered"));

    let login = actix_test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": "vendor@example.com", "password": "hunter2hunter2" }))
        .to_request();
    let response = actix_test::call_service(&app, login).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["user"]["name"], json!("Vera"));
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    register(&app, "Vera", "vendor@example.com", "vendor").await;

    let login = actix_test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": "vendor@example.com", "password": "not-the-password" }))
        .to_request();
    let response = actix_test::call_service(&app, login).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn listing_reads_require_a_bearer_token() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/products")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn upload_by_non_vendor_is_rejected_without_side_effects() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (_, body) = register(&app, "Ivan", "individual@example.com", "individual").await;
    let token = token_of(&body);

    let request = upload_request(
        &token,
        PRODUCT_FIELDS,
        Some(("bottle.png", "image/png", PNG_BYTES)),
    );
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], json!("Not authorized as a vendor"));
    assert_eq!(harness.products.count(), 0);
    assert_eq!(stored_upload_count(&harness), 0);
}

#[actix_web::test]
async fn vendor_upload_creates_listing_with_verbatim_analysis() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (_, body) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    let token = token_of(&body);
    let vendor_id = body["user"]["id"].as_str().unwrap().to_string();

    let request = upload_request(
        &token,
        PRODUCT_FIELDS,
        Some(("bottle.png", "image/png", PNG_BYTES)),
    );
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["name"], json!("Test Plastic Bottle"));
    assert_eq!(body["description"], json!("A clear plastic bottle."));
    assert_eq!(body["price"], json!(0.5));
    assert_eq!(body["analysis"], json!(FIXED_VERDICT));
    assert_eq!(body["status"], json!("available"));
    assert_eq!(body["vendor"]["id"], json!(vendor_id));
    assert_eq!(body["vendor"]["name"], json!("Vera"));

    assert_eq!(harness.products.count(), 1);
    assert_eq!(stored_upload_count(&harness), 1);
}

#[actix_web::test]
async fn upload_with_missing_field_is_a_validation_error() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (_, body) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    let token = token_of(&body);

    let fields = &[
        ("name", "Test Plastic Bottle"),
        ("description", "A clear plastic bottle."),
    ];
    let request = upload_request(&token, fields, Some(("bottle.png", "image/png", PNG_BYTES)));
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], json!("price is required"));
    assert_eq!(harness.products.count(), 0);
}

#[actix_web::test]
async fn upload_with_negative_price_is_rejected() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (_, body) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    let token = token_of(&body);

    let fields = &[
        ("name", "Test Plastic Bottle"),
        ("description", "A clear plastic bottle."),
        ("price", "-1.00"),
    ];
    let request = upload_request(&token, fields, Some(("bottle.png", "image/png", PNG_BYTES)));
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.products.count(), 0);
    assert_eq!(stored_upload_count(&harness), 0);
}

#[actix_web::test]
async fn oracle_failure_persists_nothing_and_reclaims_the_file() {
    let harness = harness(Arc::new(FailingOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (_, body) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    let token = token_of(&body);

    let request = upload_request(
        &token,
        PRODUCT_FIELDS,
        Some(("bottle.png", "image/png", PNG_BYTES)),
    );
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], json!("analysis service unavailable"));
    assert_eq!(harness.products.count(), 0);
    assert_eq!(stored_upload_count(&harness), 0);
}

#[actix_web::test]
async fn list_returns_all_listings_in_creation_order() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (_, body) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    let token = token_of(&body);

    for name in ["First Bottle", "Second Bottle"] {
        let fields = &[
            ("name", name),
            ("description", "A clear plastic bottle."),
            ("price", "0.50"),
        ];
        let request = upload_request(&token, fields, Some(("bottle.png", "image/png", PNG_BYTES)));
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = actix_test::TestRequest::get()
        .uri("/api/products")
        .insert_header(("authorization", format!("Bearer {}", token)))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let listings = body.as_array().expect("array response");
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0]["name"], json!("First Bottle"));
    assert_eq!(listings[1]["name"], json!("Second Bottle"));
}

#[actix_web::test]
async fn get_by_unknown_id_is_not_found_and_bad_id_is_rejected() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (_, body) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    let token = token_of(&body);

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/products/{}", uuid::Uuid::new_v4()))
        .insert_header(("authorization", format!("Bearer {}", token)))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = actix_test::TestRequest::get()
        .uri("/api/products/not-a-uuid")
        .insert_header(("authorization", format!("Bearer {}", token)))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], json!("invalid product id"));
}

// The full scenario from the product brief: one vendor, one individual, a
// rejected upload, a successful upload, then list and fetch-by-id.
#[actix_web::test]
async fn end_to_end_marketplace_flow() {
    let harness = harness(Arc::new(FixedOracle)).await;
    let app = actix_test::init_service(test_app(&harness)).await;

    let (status, vendor_body) = register(&app, "Vera", "vendor@example.com", "vendor").await;
    assert_eq!(status, StatusCode::CREATED);
    let vendor_token = token_of(&vendor_body);
    let vendor_id = vendor_body["user"]["id"].as_str().unwrap().to_string();

    let (status, individual_body) =
        register(&app, "Ivan", "individual@example.com", "individual").await;
    assert_eq!(status, StatusCode::CREATED);
    let individual_token = token_of(&individual_body);

    let request = upload_request(
        &individual_token,
        PRODUCT_FIELDS,
        Some(("bottle.png", "image/png", PNG_BYTES)),
    );
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = upload_request(
        &vendor_token,
        PRODUCT_FIELDS,
        Some(("bottle.png", "image/png", PNG_BYTES)),
    );
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(response).await;
    assert_eq!(created["analysis"], json!(FIXED_VERDICT));
    let product_id = created["id"].as_str().unwrap().to_string();

    let request = actix_test::TestRequest::get()
        .uri("/api/products")
        .insert_header(("authorization", format!("Bearer {}", individual_token)))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listings: Value = actix_test::read_body_json(response).await;
    let listings = listings.as_array().unwrap();
    assert!(!listings.is_empty());
    assert_eq!(listings[0]["name"], json!("Test Plastic Bottle"));

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/products/{}", product_id))
        .insert_header(("authorization", format!("Bearer {}", vendor_token)))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = actix_test::read_body_json(response).await;
    assert_eq!(fetched["vendor"]["id"], json!(vendor_id));
}
