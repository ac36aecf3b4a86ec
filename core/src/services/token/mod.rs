//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Signing key derivation from the configured secret
//! - JWT signing and verification
//! - Token creation, optionally backed by single-active-token storage
//! - Claim inspection and server-side invalidation

mod config;
mod key_manager;
mod service;
pub mod signer;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use key_manager::{SigningKey, MIN_SECRET_LENGTH};
pub use service::{PersistentTokenService, StatelessTokenService, TokenService};
pub use signer::{JwtSigner, TokenSigner};
