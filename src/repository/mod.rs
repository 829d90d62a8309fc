//! Repository layer for database operations

pub mod books;
pub mod users;

use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Database;

use crate::error::{AppError, AppResult};

/// Main repository struct holding the database handle
#[derive(Clone)]
pub struct Repository {
    pub db: Database,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository against the given database
    pub fn new(db: &Database) -> Self {
        Self {
            books: books::BooksRepository::new(db),
            users: users::UsersRepository::new(db),
            db: db.clone(),
        }
    }

    /// Create the unique `id` indexes both collections rely on
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.books.ensure_indexes().await?;
        self.users.ensure_indexes().await?;
        Ok(())
    }

    /// Round trip to the server, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

/// True when the server rejected a write because of the unique `id` index
pub(crate) fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

/// Translate a write failure, keeping duplicate-key rejections distinguishable
/// so the id allocator can retry them
pub(crate) fn map_write_error(err: mongodb::error::Error, collection: &str) -> AppError {
    if is_duplicate_key_error(&err) {
        AppError::Conflict(format!("Duplicate id in {} collection", collection))
    } else {
        AppError::Database(err)
    }
}
