//! Book model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Book identifier, assigned by the store at creation time
pub type BookId = u64;

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: BookId,
    /// Book title
    pub name: String,
    pub author: String,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
}

impl CreateBook {
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_json_shape() {
        let book = Book {
            id: 1,
            name: "Dune".to_string(),
            author: "Herbert".to_string(),
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "id": 1, "name": "Dune", "author": "Herbert" })
        );
    }

    #[test]
    fn test_create_book_validation() {
        assert!(CreateBook::new("Dune", "Herbert").validate().is_ok());

        let errors = CreateBook::new("", "X").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let errors = CreateBook::new("Dune", "").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("author"));
    }

    #[test]
    fn test_create_book_missing_field_is_rejected() {
        let parsed = serde_json::from_str::<CreateBook>(r#"{"name":"Dune"}"#);
        assert!(parsed.is_err());
    }
}
