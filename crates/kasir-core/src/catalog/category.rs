//! Category types for product organization.

use crate::de;
use crate::ids::CategoryId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product category as listed by `GET /api/category`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Numeric row id; new products reference their category by it.
    pub id: i64,
    /// Category uuid, used by update and delete.
    pub uuid: CategoryId,
    /// Category name.
    pub name: String,
    /// Money tied up in stock of this category.
    #[serde(default, deserialize_with = "de::idr")]
    pub capital: Money,
    /// Units in stock across the category's products.
    #[serde(default, deserialize_with = "de::int")]
    pub remaining_stock: i64,
}

impl Category {
    pub fn has_stock(&self) -> bool {
        self.remaining_stock > 0
    }

    /// Initial shown on category badges.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Body of category create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_listing() {
        let category: Category = serde_json::from_str(
            r#"{"id":3,"uuid":"cat-3","name":"minuman","capital":"120000","remaining_stock":"0"}"#,
        )
        .unwrap();
        assert_eq!(category.capital, Money::idr(120000));
        assert!(!category.has_stock());
        assert_eq!(category.initial(), Some('M'));
    }

    #[test]
    fn test_category_defaults_missing_totals() {
        let category: Category =
            serde_json::from_str(r#"{"id":1,"uuid":"cat-1","name":"Snack"}"#).unwrap();
        assert!(category.capital.is_zero());
        assert_eq!(category.remaining_stock, 0);
    }
}
