//! Storage contracts for issued tokens.

pub mod token;

pub use token::{
    DefaultKeySchema, InMemoryTokenStorage, KeySchema, NamespacedKeySchema, TokenStorage,
};
