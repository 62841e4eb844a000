use crate::{
    error::AppError,
    extractors::{CreatePayload, Payload},
    models::User,
    params::SearchParams,
    store::Store,
    validation::{self, StringList},
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
pub enum UserSort {
    Username,
    Joined,
}

pub async fn get_users(
    State(store): State<Arc<Store>>,
    params: Result<Query<SearchParams<UserSort>>, QueryRejection>,
) -> Result<Json<Vec<User>>, AppError> {
    let Query(params) = params.map_err(AppError::invalid_query)?;

    let users: Vec<User> = store
        .users
        .read()
        .await
        .list()
        .iter()
        .filter(|u| {
            params.matches(&u.username)
                || params.matches(&u.email)
                || u.display_name.as_deref().is_some_and(|d| params.matches(d))
        })
        .cloned()
        .collect();

    let users = params.arrange(users, |sort, a, b| match sort {
        UserSort::Username => a.username.to_lowercase().cmp(&b.username.to_lowercase()),
        UserSort::Joined => a.created_at.cmp(&b.created_at),
    });

    Ok(Json(users))
}

pub async fn get_one_user(
    State(store): State<Arc<Store>>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let users = store.users.read().await;
    let user = users.get(&id).cloned().ok_or(AppError::NotFound)?;
    Ok(Json(user))
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserRequest {
    #[serde(deserialize_with = "validation::text")]
    pub username: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub password: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "validation::text")]
    pub profile_image_url: Option<String>,
    pub roles: Option<StringList>,
}

impl Payload for CreateUserRequest {
    const ENTITY: &'static str = "user";
}

/// A create request that passed validation.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub roles: Vec<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        // Passwords are checked for blankness but kept as typed.
        let password = self.password.filter(|p| !p.trim().is_empty());
        let (Some(username), Some(password), Some(email)) =
            (validation::trimmed(self.username), password, validation::trimmed(self.email))
        else {
            return Err(AppError::validation(
                "Username, password, and email are required.",
            ));
        };

        if !validation::is_valid_email(&email) {
            return Err(AppError::validation("Email address is invalid."));
        }

        Ok(NewUser {
            username,
            password,
            email,
            display_name: validation::trimmed(self.display_name),
            profile_image_url: validation::trimmed(self.profile_image_url),
            roles: StringList::clean_optional(self.roles),
        })
    }
}

#[derive(Serialize)]
pub struct UserCreated {
    pub message: &'static str,
    pub user: User,
}

pub async fn create_user(
    State(store): State<Arc<Store>>,
    CreatePayload(payload): CreatePayload<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserCreated>), AppError> {
    let new_user = payload.validate()?;
    let now = Utc::now();

    let user = store.users.write().await.insert_with(|id| User {
        id,
        username: new_user.username,
        password: new_user.password,
        email: new_user.email,
        display_name: new_user.display_name,
        profile_image_url: new_user.profile_image_url,
        roles: new_user.roles,
        created_at: now,
        updated_at: now,
    });

    tracing::info!(id = %user.id, username = %user.username, "user created");

    Ok((
        StatusCode::CREATED,
        Json(UserCreated {
            message: "User added successfully",
            user,
        }),
    ))
}
