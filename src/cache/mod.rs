pub mod auth_payload;
pub mod token_store;
