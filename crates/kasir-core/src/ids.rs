//! Newtype identifiers.
//!
//! Identifiers are assigned by the server; the client only carries them.
//! Newtypes keep a product uuid from being passed where a category uuid or
//! a transaction number is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Product uuid. Keys cart lines.
    ProductId
);
define_id!(
    /// Category uuid.
    CategoryId
);
define_id!(
    /// Transaction number (`no_transaction`) returned after a sale.
    TransactionRef
);

/// The reference the transaction endpoint expects for a product.
///
/// The API identifies products in sale payloads by their numeric row id,
/// while other collaborators hand out opaque string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Numeric(i64),
    Key(String),
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductRef::Numeric(id) => write!(f, "{}", id),
            ProductRef::Key(key) => write!(f, "{}", key),
        }
    }
}

impl From<i64> for ProductRef {
    fn from(id: i64) -> Self {
        ProductRef::Numeric(id)
    }
}

impl From<&ProductId> for ProductRef {
    fn from(id: &ProductId) -> Self {
        ProductRef::Key(id.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = TransactionRef::new("TRX-0001");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""TRX-0001""#);
    }

    #[test]
    fn test_product_ref_untagged() {
        assert_eq!(serde_json::to_string(&ProductRef::Numeric(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&ProductRef::Key("A".into())).unwrap(),
            r#""A""#
        );

        let parsed: ProductRef = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, ProductRef::Numeric(42));
    }

    #[test]
    fn test_product_ref_from_id() {
        let id = ProductId::new("uuid-1");
        assert_eq!(ProductRef::from(&id), ProductRef::Key("uuid-1".into()));
    }
}
