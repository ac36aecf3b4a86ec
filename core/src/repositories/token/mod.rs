pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod key_schema;
pub mod memory;

pub use key_schema::{DefaultKeySchema, KeySchema, NamespacedKeySchema, TOKEN_KEY_PREFIX};
pub use memory::InMemoryTokenStorage;
pub use r#trait::TokenStorage;
