use crate::{
    config::AppConfig,
    error::AppError,
    extractors::{CreatePayload, Payload},
    models::BlogPost,
    params::SearchParams,
    store::Store,
    validation::{self, StringList},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const UNCATEGORIZED: &str = "Uncategorized";
const EXCERPT_CHARS: usize = 120;

static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(the|a|an)\s+").expect("article pattern compiles"));

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    Date,
    Title,
}

#[derive(serde::Deserialize)]
pub struct PostParams {
    #[serde(flatten)]
    base: SearchParams<PostSort>,
    tag: Option<String>,
    author: Option<String>,
    category: Option<String>,
}

impl PostParams {
    fn admits(&self, post: &BlogPost) -> bool {
        self.base.matches(&post.title)
            && self.tag.as_ref().is_none_or(|t| post.tags.contains(t))
            && self.author.as_ref().is_none_or(|a| &post.author_id == a)
            && self
                .category
                .as_deref()
                .is_none_or(|c| post.category_id.as_deref() == Some(c))
    }
}

/// Title with any leading article dropped, lowercased for ordering.
fn title_key(title: &str) -> String {
    LEADING_ARTICLE.replace(title, "").to_lowercase()
}

/// The first `EXCERPT_CHARS` characters, with an ellipsis when cut.
pub fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Display names for the soft references a post carries.
struct Labels {
    authors: HashMap<String, String>,
    categories: HashMap<String, String>,
}

impl Labels {
    async fn load(store: &Store) -> Self {
        let authors = store
            .users
            .read()
            .await
            .list()
            .iter()
            .map(|u| (u.id.clone(), u.label().to_string()))
            .collect();
        let categories = store
            .categories
            .read()
            .await
            .list()
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        Self {
            authors,
            categories,
        }
    }

    fn author(&self, id: &str) -> String {
        self.authors
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    fn category(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.categories.get(id))
            .cloned()
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    }
}

async fn matching_posts(store: &Store, params: PostParams) -> Vec<BlogPost> {
    let posts: Vec<BlogPost> = store
        .posts
        .read()
        .await
        .list()
        .iter()
        .filter(|p| params.admits(p))
        .cloned()
        .collect();

    params.base.arrange(posts, |sort, a, b| match sort {
        PostSort::Date => a.created_at.cmp(&b.created_at),
        PostSort::Title => title_key(&a.title).cmp(&title_key(&b.title)),
    })
}

pub async fn get_posts(
    State(store): State<Arc<Store>>,
    params: Result<Query<PostParams>, QueryRejection>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    let Query(params) = params.map_err(AppError::invalid_query)?;
    Ok(Json(matching_posts(&store, params).await))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub author_name: String,
    pub category_name: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The list page view: each post with its author and category resolved.
pub async fn get_post_summaries(
    State(store): State<Arc<Store>>,
    params: Result<Query<PostParams>, QueryRejection>,
) -> Result<Json<Vec<PostSummary>>, AppError> {
    let Query(params) = params.map_err(AppError::invalid_query)?;
    let posts = matching_posts(&store, params).await;
    let labels = Labels::load(&store).await;

    let summaries = posts
        .into_iter()
        .map(|post| PostSummary {
            author_name: labels.author(&post.author_id),
            category_name: labels.category(post.category_id.as_deref()),
            excerpt: excerpt(&post.content),
            id: post.id,
            title: post.title,
            author_id: post.author_id,
            tags: post.tags,
            cover_image_url: post.cover_image_url,
            created_at: post.created_at,
        })
        .collect();

    Ok(Json(summaries))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: BlogPost,
    pub author_name: String,
    pub category_name: String,
}

pub async fn get_one_post(
    State(store): State<Arc<Store>>,
    Path(id): Path<String>,
) -> Result<Json<PostDetail>, AppError> {
    let post = store
        .posts
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    let labels = Labels::load(&store).await;

    Ok(Json(PostDetail {
        author_name: labels.author(&post.author_id),
        category_name: labels.category(post.category_id.as_deref()),
        post,
    }))
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePostRequest {
    #[serde(deserialize_with = "validation::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub author_id: Option<String>,
    pub tags: Option<StringList>,
    #[serde(deserialize_with = "validation::text")]
    pub cover_image_url: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub category_id: Option<String>,
}

impl Payload for CreatePostRequest {
    const ENTITY: &'static str = "blog post";
}

#[derive(Debug)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub tags: Vec<String>,
    pub cover_image_url: Option<String>,
    pub category_id: Option<String>,
}

impl CreatePostRequest {
    /// Checks run in the order the add form reports them: title, content
    /// length, author.
    pub fn validate(self, min_content_length: usize) -> Result<NewPost, AppError> {
        let title =
            validation::trimmed(self.title).ok_or_else(|| AppError::validation("Title is required."))?;

        let content = validation::trimmed(self.content).unwrap_or_default();
        if !validation::has_min_chars(&content, min_content_length) {
            return Err(AppError::validation(format!(
                "Content must be at least {min_content_length} characters."
            )));
        }

        let author_id = validation::trimmed(self.author_id)
            .ok_or_else(|| AppError::validation("Author is required."))?;

        Ok(NewPost {
            title,
            content,
            author_id,
            tags: StringList::clean_optional(self.tags),
            cover_image_url: validation::trimmed(self.cover_image_url),
            category_id: validation::trimmed(self.category_id),
        })
    }
}

#[derive(Serialize)]
pub struct PostCreated {
    pub message: &'static str,
    pub post: BlogPost,
}

pub async fn create_post(
    State(store): State<Arc<Store>>,
    State(config): State<AppConfig>,
    CreatePayload(payload): CreatePayload<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostCreated>), AppError> {
    let new_post = payload.validate(config.min_content_length)?;
    let now = Utc::now();

    let post = store.posts.write().await.insert_with(|id| BlogPost {
        id,
        title: new_post.title,
        content: new_post.content,
        author_id: new_post.author_id,
        created_at: now,
        updated_at: now,
        tags: new_post.tags,
        cover_image_url: new_post.cover_image_url,
        category_id: new_post.category_id,
    });

    tracing::info!(id = %post.id, author_id = %post.author_id, "blog post created");

    Ok((
        StatusCode::CREATED,
        Json(PostCreated {
            message: "Blog post added successfully",
            post,
        }),
    ))
}
