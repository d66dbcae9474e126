//! API credential model

use std::fmt;

/// An opaque API key for the generation backend
///
/// The secret never appears in `Debug` or `Display` output; only a short
/// prefix survives so log lines can still tell keys apart.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Wrap a raw key
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw key, for building request headers
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Redacted form used in logs
    pub fn redacted(&self) -> String {
        match self.0.get(..8) {
            Some(prefix) if self.0.len() > 8 => format!("{prefix}...[REDACTED]"),
            _ => "[REDACTED]".to_string(),
        }
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiCredential").field(&self.redacted()).finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl From<&str> for ApiCredential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ApiCredential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_key_keeps_prefix() {
        let key = ApiCredential::new("AIzaSyA1234567890abcdef");
        assert_eq!(key.redacted(), "AIzaSyA1...[REDACTED]");
        assert_eq!(key.to_string(), "AIzaSyA1...[REDACTED]");
        assert!(!format!("{key:?}").contains("567890"));
    }

    #[test]
    fn test_short_key_fully_redacted() {
        let key = ApiCredential::new("short");
        assert_eq!(key.redacted(), "[REDACTED]");
    }

    #[test]
    fn test_expose_returns_secret() {
        let key = ApiCredential::from("secret-value-123");
        assert_eq!(key.expose(), "secret-value-123");
    }
}
