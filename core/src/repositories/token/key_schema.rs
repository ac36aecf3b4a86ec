//! Storage key schemas mapping a token identity to a storage key.

use crate::domain::entities::token::TokenParameters;

/// Leading segment of every token key
pub const TOKEN_KEY_PREFIX: &str = "tokens";

/// Maps a `(subject, token_type)` identity to a storage key
///
/// Keys are joined with `:`. Subjects or types that themselves contain `:`
/// can collide with other identities; callers supplying such values accept that.
pub trait KeySchema: Send + Sync {
    /// Storage key for an identity
    fn token_key(&self, subject: &str, token_type: &str) -> String;

    /// Glob pattern matching every key this schema produces
    fn key_pattern(&self) -> String;

    /// Storage key for the identity of `params`
    fn key_for(&self, params: &TokenParameters) -> String {
        self.token_key(params.subject(), params.token_type())
    }
}

/// `tokens:<subject>:<type>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeySchema;

impl KeySchema for DefaultKeySchema {
    fn token_key(&self, subject: &str, token_type: &str) -> String {
        format!("{}:{}:{}", TOKEN_KEY_PREFIX, subject, token_type)
    }

    fn key_pattern(&self) -> String {
        format!("{}:*", TOKEN_KEY_PREFIX)
    }
}

/// `<namespace>:tokens:<subject>:<type>`, for deployments sharing one keyspace
#[derive(Debug, Clone)]
pub struct NamespacedKeySchema {
    namespace: String,
}

impl NamespacedKeySchema {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl KeySchema for NamespacedKeySchema {
    fn token_key(&self, subject: &str, token_type: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            self.namespace, TOKEN_KEY_PREFIX, subject, token_type
        )
    }

    fn key_pattern(&self) -> String {
        format!("{}:{}:*", escape_glob(&self.namespace), TOKEN_KEY_PREFIX)
    }
}

/// Escapes glob metacharacters so a literal segment matches only itself
fn escape_glob(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for c in segment.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
