use serde::{Deserialize, Serialize};

/// Claims read from the bearer token. Only `sub` identifies the caller; the
/// rest is kept so tokens can be minted for local runs and tests.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // e.g. "auth0|5f7c..."
    pub exp: usize,  // expiry (unix)
    #[serde(default)]
    pub iat: usize, // issued at
}

/// Identity of the authenticated caller; the partition key of every item
/// they own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
