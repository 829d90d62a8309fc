//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblos API",
        version = "1.0.0",
        description = "Library Catalog CRUD Service REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookStatus,
            crate::models::book::BookTag,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Users
            crate::models::user::User,
            crate::models::user::BorrowedBook,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router, serving the Swagger UI and the
/// machine-readable document under /api-docs
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
