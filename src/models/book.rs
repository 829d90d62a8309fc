//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Lifecycle status of a catalog book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "borrowed")]
    Borrowed,
    #[serde(rename = "in maintenance")]
    InMaintenance,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
            BookStatus::InMaintenance => "in maintenance",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(BookStatus::Available),
            "borrowed" => Ok(BookStatus::Borrowed),
            "in maintenance" => Ok(BookStatus::InMaintenance),
            _ => Err(format!(
                "Invalid status: {} (expected one of: available, borrowed, in maintenance)",
                s
            )),
        }
    }
}

/// Embedded tag on a book, no independent lifecycle
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookTag {
    pub id: i32,
    pub name: String,
}

/// Full book document as persisted in the `books` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
    #[serde(default)]
    pub tags: Vec<BookTag>,
}

/// Book search query parameters
///
/// Each filter, when present, is a case-insensitive substring match;
/// filters combine with logical AND.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}

/// Create book request
///
/// `title` and `author` are required; presence is checked in the service
/// so a missing field yields a descriptive 400 rather than a rejection
/// from the deserializer.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    pub id: Option<i32>,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    /// One of "available", "borrowed", "in maintenance"
    pub status: Option<String>,
    pub tags: Option<Vec<BookTag>>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub id: Option<i32>,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    /// One of "available", "borrowed", "in maintenance"
    pub status: Option<String>,
    pub tags: Option<Vec<BookTag>>,
}
