use crate::{
    error::AppError,
    extractors::{CreatePayload, Payload},
    models::Category,
    params::SearchParams,
    store::Store,
    validation,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CategorySort {
    Name,
}

pub async fn get_categories(
    State(store): State<Arc<Store>>,
    params: Result<Query<SearchParams<CategorySort>>, QueryRejection>,
) -> Result<Json<Vec<Category>>, AppError> {
    let Query(params) = params.map_err(AppError::invalid_query)?;

    let categories: Vec<Category> = store
        .categories
        .read()
        .await
        .list()
        .iter()
        .filter(|c| params.matches(&c.name))
        .cloned()
        .collect();

    let categories = params.arrange(categories, |sort, a, b| match sort {
        CategorySort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });

    Ok(Json(categories))
}

pub async fn get_one_category(
    State(store): State<Arc<Store>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    let categories = store.categories.read().await;
    let category = categories.get(&id).cloned().ok_or(AppError::NotFound)?;
    Ok(Json(category))
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct CreateCategoryRequest {
    #[serde(deserialize_with = "validation::text")]
    pub name: Option<String>,
}

impl Payload for CreateCategoryRequest {
    const ENTITY: &'static str = "category";
}

#[derive(Serialize)]
pub struct CategoryCreated {
    pub message: &'static str,
    pub category: Category,
}

pub async fn create_category(
    State(store): State<Arc<Store>>,
    CreatePayload(payload): CreatePayload<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryCreated>), AppError> {
    let name = validation::trimmed(payload.name)
        .ok_or_else(|| AppError::validation("Category name is required."))?;
    let now = Utc::now();

    let category = store.categories.write().await.insert_with(|id| Category {
        id,
        name,
        created_at: now,
        updated_at: now,
    });

    tracing::info!(id = %category.id, name = %category.name, "category created");

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "Category added successfully",
            category,
        }),
    ))
}
