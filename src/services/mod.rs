//! Business logic services

pub mod books;
pub mod users;

use rand::Rng;

use crate::error::{AppError, AppResult};
use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub users: users::UsersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            repository,
        }
    }

    /// Database connectivity check for the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

/// Bound on id allocation retries
pub(crate) const MAX_ID_ATTEMPTS: u32 = 16;

/// Draw a random record identifier in the 5-digit range
pub(crate) fn random_record_id() -> i32 {
    rand::thread_rng().gen_range(10_000..=99_999)
}

/// Extract a required request field, or fail with a descriptive 400
pub(crate) fn required(value: &Option<String>, field: &str) -> AppResult<String> {
    value
        .clone()
        .ok_or_else(|| AppError::Validation(format!("Missing required field: {}", field)))
}
