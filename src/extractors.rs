use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// A create request body. `ENTITY` names the record in error messages.
pub trait Payload: DeserializeOwned {
    const ENTITY: &'static str;
}

/// JSON body parsed whatever the request's content type says. A well-formed
/// body of the wrong shape is a 400, anything unreadable is a 500 naming the
/// entity.
pub struct CreatePayload<T>(pub T);

impl<T: Payload> CreatePayload<T> {
    pub fn parse(bytes: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice::<T>(bytes)
            .map(CreatePayload)
            .map_err(|e| match e.classify() {
                Category::Data => AppError::InvalidBody {
                    entity: T::ENTITY,
                    reason: e.to_string(),
                },
                _ => AppError::MalformedBody {
                    entity: T::ENTITY,
                    reason: e.to_string(),
                },
            })
    }
}

impl<S, T> FromRequest<S> for CreatePayload<T>
where
    T: Payload,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::MalformedBody {
                entity: T::ENTITY,
                reason: e.body_text(),
            })?;
        Self::parse(&bytes)
    }
}
