//! # tokenkeep Core
//!
//! Core token lifecycle logic for tokenkeep.
//! This crate contains the token parameter entities, the error taxonomy,
//! the token storage contract with its in-memory implementation, and the
//! token services that coordinate signing, verification and persistence.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{TokenParameters, TokenParametersBuilder, TokenPayload};
pub use errors::*;
pub use repositories::{
    DefaultKeySchema, InMemoryTokenStorage, KeySchema, NamespacedKeySchema, TokenStorage,
};
pub use services::{
    JwtSigner, PersistentTokenService, SigningKey, StatelessTokenService, TokenService,
    TokenServiceConfig, TokenSigner,
};
