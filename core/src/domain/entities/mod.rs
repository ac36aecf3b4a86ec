//! Domain entities representing tokens before and after signing.

pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use token::{
    TokenParameters, TokenParametersBuilder, TokenPayload,
    ACCESS_TOKEN_TYPE, REFRESH_TOKEN_TYPE, RESERVED_CLAIMS, TOKEN_TYPE_KEY,
};
