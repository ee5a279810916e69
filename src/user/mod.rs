pub mod auth;
mod user_store;

pub use auth::{AuthError, AuthGate, Credentials};
pub use user_store::CredentialStore;
