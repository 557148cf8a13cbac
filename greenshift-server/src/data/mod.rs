pub mod oracle_client;
pub mod product_repository;
pub mod user_repository;
