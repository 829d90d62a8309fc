//! User collection access

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};

use crate::error::AppResult;
use crate::models::user::User;

use super::map_write_error;

#[derive(Clone)]
pub struct UsersRepository {
    collection: Collection<User>,
}

impl UsersRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
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

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "id": id }, None).await?)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "id": id }, None)
            .await?;
        Ok(count > 0)
    }

    /// Insert a new user; a duplicate id surfaces as `AppError::Conflict`
    pub async fn insert(&self, user: &User) -> AppResult<()> {
        self.collection
            .insert_one(user, None)
            .await
            .map_err(|e| map_write_error(e, "users"))?;
        Ok(())
    }

    /// Apply a `$set` merge to the user with the given id, returning the
    /// updated document, or `None` when no user matches
    pub async fn update(&self, id: i32, fields: Document) -> AppResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(doc! { "id": id }, doc! { "$set": fields }, options)
            .await
            .map_err(|e| map_write_error(e, "users"))
    }

    /// Remove the user with the given id, returning the deleted document,
    /// or `None` when no user matches
    pub async fn delete(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "id": id }, None)
            .await?)
    }
}
