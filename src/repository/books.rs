//! Book collection access

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};

use crate::error::AppResult;
use crate::models::book::{Book, BookQuery};

use super::map_write_error;

#[derive(Clone)]
pub struct BooksRepository {
    collection: Collection<Book>,
}

impl BooksRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("books"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        Ok(())
    }

    /// Find books matching the query filters; an empty query returns every book
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let cursor = self.collection.find(filter_document(query), None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.collection.find_one(doc! { "id": id }, None).await?)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "id": id }, None)
            .await?;
        Ok(count > 0)
    }

    /// Insert a new book; a duplicate id surfaces as `AppError::Conflict`
    pub async fn insert(&self, book: &Book) -> AppResult<()> {
        self.collection
            .insert_one(book, None)
            .await
            .map_err(|e| map_write_error(e, "books"))?;
        Ok(())
    }

    /// Apply a `$set` merge to the book with the given id, returning the
    /// updated document, or `None` when no book matches
    pub async fn update(&self, id: i32, fields: Document) -> AppResult<Option<Book>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(doc! { "id": id }, doc! { "$set": fields }, options)
            .await
            .map_err(|e| map_write_error(e, "books"))
    }
}

/// Build the find filter for a book search
///
/// Each present filter becomes a case-insensitive substring match; the
/// substring is escaped so user input is never interpreted as a pattern.
pub(crate) fn filter_document(query: &BookQuery) -> Document {
    let mut filter = Document::new();
    for (field, value) in [
        ("title", &query.title),
        ("author", &query.author),
        ("category", &query.category),
    ] {
        if let Some(value) = value {
            filter.insert(
                field,
                doc! { "$regex": regex::escape(value), "$options": "i" },
            );
        }
    }
    filter
}
