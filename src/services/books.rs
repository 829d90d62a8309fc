//! Book catalog service

use std::str::FromStr;

use mongodb::bson::{self, Document};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::book::{Book, BookQuery, BookStatus, CreateBook, UpdateBook};
use crate::repository::Repository;

use super::{random_record_id, required, MAX_ID_ATTEMPTS};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    /// Get book by id
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No book with id {}", id)))
    }

    /// Create a new book with a collection-unique id.
    ///
    /// The client-supplied id is tried first; on a duplicate-key rejection
    /// from the unique index a fresh 5-digit id is drawn and the insert
    /// retried. Uniqueness is guaranteed by the index, not by a pre-check.
    pub async fn create_book(&self, input: CreateBook) -> AppResult<Book> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let title = required(&input.title, "title")?;
        let author = required(&input.author, "author")?;
        let status = parse_status(input.status.as_deref())?;

        let mut id = input.id.unwrap_or_else(random_record_id);
        for _ in 0..MAX_ID_ATTEMPTS {
            let book = Book {
                id,
                title: title.clone(),
                author: author.clone(),
                year: input.year,
                category: input.category.clone(),
                status,
                tags: input.tags.clone().unwrap_or_default(),
            };
            match self.repository.books.insert(&book).await {
                Ok(()) => {
                    tracing::debug!("Created book id={}", book.id);
                    return Ok(book);
                }
                Err(e) if e.is_duplicate_key() => id = random_record_id(),
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Internal(
            "Exhausted id allocation attempts for books".to_string(),
        ))
    }

    /// Merge-update the book matched by the path id.
    ///
    /// A supplied id owned by a different record is replaced by a freshly
    /// allocated one; a supplied id equal to the record's own, or matching
    /// no record, is kept. An omitted id leaves the stored id untouched.
    pub async fn update_book(&self, id: i32, input: UpdateBook) -> AppResult<Book> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        required(&input.title, "title")?;
        required(&input.author, "author")?;
        let status = parse_status(input.status.as_deref())?;

        let mut new_id = input.id;
        if let Some(requested) = input.id {
            if requested != id && self.repository.books.exists(requested).await? {
                new_id = Some(self.allocate_unused_id().await?);
            }
        }

        for _ in 0..MAX_ID_ATTEMPTS {
            let fields = update_document(&input, new_id, status)?;
            match self.repository.books.update(id, fields).await {
                Ok(Some(book)) => return Ok(book),
                Ok(None) => return Err(AppError::NotFound(format!("No book with id {}", id))),
                Err(e) if e.is_duplicate_key() => new_id = Some(random_record_id()),
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Internal(
            "Exhausted id allocation attempts for books".to_string(),
        ))
    }

    async fn allocate_unused_id(&self) -> AppResult<i32> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = random_record_id();
            if !self.repository.books.exists(candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::Internal(
            "Exhausted id allocation attempts for books".to_string(),
        ))
    }
}

/// Parse and validate the status enum when supplied
fn parse_status(status: Option<&str>) -> AppResult<Option<BookStatus>> {
    status
        .map(BookStatus::from_str)
        .transpose()
        .map_err(AppError::Validation)
}

/// Build the `$set` document from the supplied update fields
fn update_document(
    input: &UpdateBook,
    new_id: Option<i32>,
    status: Option<BookStatus>,
) -> AppResult<Document> {
    let mut fields = Document::new();
    if let Some(id) = new_id {
        fields.insert("id", id);
    }
    if let Some(title) = &input.title {
        fields.insert("title", title.as_str());
    }
    if let Some(author) = &input.author {
        fields.insert("author", author.as_str());
    }
    if let Some(year) = input.year {
        fields.insert("year", year);
    }
    if let Some(category) = &input.category {
        fields.insert("category", category.as_str());
    }
    if let Some(status) = status {
        fields.insert("status", status.as_str());
    }
    if let Some(tags) = &input.tags {
        fields.insert("tags", bson::to_bson(tags)?);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookTag;

    fn update_input() -> UpdateBook {
        UpdateBook {
            id: None,
            title: Some("Dune".to_string()),
            author: Some("Herbert".to_string()),
            year: None,
            category: None,
            status: None,
            tags: None,
        }
    }

    #[test]
    fn parse_status_accepts_allowed_values_and_absence() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("borrowed")).unwrap(),
            Some(BookStatus::Borrowed)
        );
    }

    #[test]
    fn parse_status_rejects_unknown_value() {
        let err = parse_status(Some("lost")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("lost")));
    }

    #[test]
    fn update_document_only_sets_supplied_fields() {
        let fields = update_document(&update_input(), None, None).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get_str("title").unwrap(), "Dune");
        assert_eq!(fields.get_str("author").unwrap(), "Herbert");
        assert!(fields.get("id").is_none());
        assert!(fields.get("status").is_none());
    }

    #[test]
    fn update_document_carries_reallocated_id_and_status() {
        let mut input = update_input();
        input.year = Some(1965);
        input.tags = Some(vec![BookTag {
            id: 1,
            name: "classic".to_string(),
        }]);
        let fields =
            update_document(&input, Some(54321), Some(BookStatus::InMaintenance)).unwrap();
        assert_eq!(fields.get_i32("id").unwrap(), 54321);
        assert_eq!(fields.get_i32("year").unwrap(), 1965);
        assert_eq!(fields.get_str("status").unwrap(), "in maintenance");
        assert_eq!(fields.get_array("tags").unwrap().len(), 1);
    }
}
