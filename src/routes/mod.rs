pub mod categories;
pub mod comments;
pub mod posts;
pub mod users;

use crate::AppState;
use axum::{Router, routing::get};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/blog", blog_routes())
        .nest("/api/categories", category_routes())
        .with_state(state)
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::get_users).post(users::create_user))
        .route("/{id}", get(users::get_one_user))
}

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::get_posts).post(posts::create_post))
        .route("/summaries", get(posts::get_post_summaries))
        .route("/{id}", get(posts::get_one_post))
        .route(
            "/{id}/comments",
            get(comments::get_comments).post(comments::create_comment),
        )
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::get_categories).post(categories::create_category))
        .route("/{id}", get(categories::get_one_category))
}
