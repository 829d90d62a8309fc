//! User model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Denormalized reference to a borrowed book
///
/// Client-managed data; no referential integrity is enforced against the
/// `books` collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowedBook {
    pub id: i32,
    pub title: String,
}

/// Full user document as persisted in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default)]
    pub borrowed_books: Vec<BorrowedBook>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub id: Option<i32>,
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: Option<String>,
    pub borrowed_books: Option<Vec<BorrowedBook>>,
}

/// Update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub id: Option<i32>,
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: Option<String>,
    pub borrowed_books: Option<Vec<BorrowedBook>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_uses_camel_case_on_the_wire() {
        let user = User {
            id: 10000,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 St James's Square".to_string(),
            borrowed_books: vec![BorrowedBook {
                id: 10001,
                title: "Dune".to_string(),
            }],
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["borrowedBooks"][0]["title"], "Dune");
    }

    #[test]
    fn user_deserializes_with_missing_borrowed_books() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "firstName": "A", "lastName": "B", "address": "C"}"#,
        )
        .unwrap();
        assert!(user.borrowed_books.is_empty());
    }
}
