//! User management service

use mongodb::bson::{self, Document};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repository::Repository;

use super::{random_record_id, required, MAX_ID_ATTEMPTS};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Get user by id
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user with id {}", id)))
    }

    /// Create a new user with a collection-unique id.
    ///
    /// Same allocation scheme as books: try the supplied id, redraw on a
    /// duplicate-key rejection from the unique index.
    pub async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let first_name = required(&input.first_name, "firstName")?;
        let last_name = required(&input.last_name, "lastName")?;
        let address = required(&input.address, "address")?;

        let mut id = input.id.unwrap_or_else(random_record_id);
        for _ in 0..MAX_ID_ATTEMPTS {
            let user = User {
                id,
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                address: address.clone(),
                borrowed_books: input.borrowed_books.clone().unwrap_or_default(),
            };
            match self.repository.users.insert(&user).await {
                Ok(()) => {
                    tracing::debug!("Created user id={}", user.id);
                    return Ok(user);
                }
                Err(e) if e.is_duplicate_key() => id = random_record_id(),
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Internal(
            "Exhausted id allocation attempts for users".to_string(),
        ))
    }

    /// Merge-update the user matched by the path id, with the same
    /// id-reallocation rules as book updates
    pub async fn update_user(&self, id: i32, input: UpdateUser) -> AppResult<User> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        required(&input.first_name, "firstName")?;
        required(&input.last_name, "lastName")?;
        required(&input.address, "address")?;

        let mut new_id = input.id;
        if let Some(requested) = input.id {
            if requested != id && self.repository.users.exists(requested).await? {
                new_id = Some(self.allocate_unused_id().await?);
            }
        }

        for _ in 0..MAX_ID_ATTEMPTS {
            let fields = update_document(&input, new_id)?;
            match self.repository.users.update(id, fields).await {
                Ok(Some(user)) => return Ok(user),
                Ok(None) => return Err(AppError::NotFound(format!("No user with id {}", id))),
                Err(e) if e.is_duplicate_key() => new_id = Some(random_record_id()),
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Internal(
            "Exhausted id allocation attempts for users".to_string(),
        ))
    }

    /// Delete user by id
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repository
            .users
            .delete(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("No user with id {}", id)))
    }

    async fn allocate_unused_id(&self) -> AppResult<i32> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = random_record_id();
            if !self.repository.users.exists(candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::Internal(
            "Exhausted id allocation attempts for users".to_string(),
        ))
    }
}

/// Build the `$set` document from the supplied update fields
fn update_document(input: &UpdateUser, new_id: Option<i32>) -> AppResult<Document> {
    let mut fields = Document::new();
    if let Some(id) = new_id {
        fields.insert("id", id);
    }
    if let Some(first_name) = &input.first_name {
        fields.insert("firstName", first_name.as_str());
    }
    if let Some(last_name) = &input.last_name {
        fields.insert("lastName", last_name.as_str());
    }
    if let Some(address) = &input.address {
        fields.insert("address", address.as_str());
    }
    if let Some(borrowed_books) = &input.borrowed_books {
        fields.insert("borrowedBooks", bson::to_bson(borrowed_books)?);
    }
    Ok(fields)
}
