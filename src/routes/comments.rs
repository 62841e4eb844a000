use crate::{
    error::AppError,
    extractors::{CreatePayload, Payload},
    models::Comment,
    routes::posts::UNKNOWN_AUTHOR,
    store::Store,
    validation,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(flatten)]
    pub comment: Comment,
    pub user_name: String,
}

async fn ensure_post(store: &Store, post_id: &str) -> Result<(), AppError> {
    match store.posts.read().await.get(post_id) {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound),
    }
}

/// Comments on one post, oldest first.
pub async fn get_comments(
    State(store): State<Arc<Store>>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    ensure_post(&store, &post_id).await?;

    let comments: Vec<Comment> = store
        .comments
        .read()
        .await
        .list()
        .iter()
        .filter(|c| c.post_id == post_id)
        .cloned()
        .collect();

    let users = store.users.read().await;
    let response = comments
        .into_iter()
        .map(|comment| CommentResponse {
            user_name: users
                .get(&comment.user_id)
                .map(|u| u.label().to_string())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            comment,
        })
        .collect();

    Ok(Json(response))
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCommentRequest {
    #[serde(deserialize_with = "validation::text")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub content: Option<String>,
}

impl Payload for CreateCommentRequest {
    const ENTITY: &'static str = "comment";
}

#[derive(Serialize)]
pub struct CommentCreated {
    pub message: &'static str,
    pub comment: Comment,
}

pub async fn create_comment(
    State(store): State<Arc<Store>>,
    Path(post_id): Path<String>,
    CreatePayload(payload): CreatePayload<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentCreated>), AppError> {
    ensure_post(&store, &post_id).await?;

    let user_id = validation::trimmed(payload.user_id)
        .ok_or_else(|| AppError::validation("User is required."))?;
    let content = validation::trimmed(payload.content)
        .ok_or_else(|| AppError::validation("Comment content is required."))?;

    let comment = store.comments.write().await.insert_with(|id| Comment {
        id,
        post_id,
        user_id,
        content,
        created_at: Utc::now(),
    });

    tracing::info!(id = %comment.id, post_id = %comment.post_id, "comment created");

    Ok((
        StatusCode::CREATED,
        Json(CommentCreated {
            message: "Comment added successfully",
            comment,
        }),
    ))
}
