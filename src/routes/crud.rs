//! Generic list/get/create/update/delete handlers shared by every resource table.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde::{Serialize, de::DeserializeOwned};
use validator::Validate;

use super::{PageQuery, parse_id};
use crate::AppState;
use crate::database::DynRepository;
use crate::error::AppError;
use crate::result::{ApiResult, Meta, list_response, message_response, success_response};

/// A table exposed over HTTP. Implementors are zero-sized markers.
pub trait Resource: Send + Sync + 'static {
    type Entity: Serialize + Send + 'static;
    type Detail: Serialize + Send + 'static;
    type Input: DeserializeOwned + Validate + Send + Sync + 'static;

    /// Singular display name used in response messages.
    const NAME: &'static str;
    /// Collection path, e.g. `/employees`.
    const PATH: &'static str;

    fn repository(state: &AppState) -> DynRepository<Self::Entity, Self::Detail, Self::Input>;

    fn check(input: &Self::Input) -> Result<(), AppError> {
        input.validate().map_err(AppError::from)
    }
}

pub fn routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(R::PATH, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/{{id}}", R::PATH),
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<ApiResult<Vec<R::Entity>>, AppError> {
    let Query(query) = query?;
    let page = query.to_page()?;

    let (items, total) = R::repository(&state).list(page).await?;
    Ok(list_response(
        &format!("{} list retrieved", R::NAME),
        items,
        Meta {
            page: page.page,
            limit: page.limit,
            total,
        },
    ))
}

pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiResult<R::Detail>, AppError> {
    let Path(raw) = id?;
    let id = parse_id(&raw)?;

    let item = R::repository(&state)
        .get(id)
        .await
        .map_err(|e| not_found_as::<R>(e.into()))?;
    Ok(success_response(
        StatusCode::OK,
        &format!("{} retrieved", R::NAME),
        item,
    ))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<ApiResult<R::Detail>, AppError> {
    let Json(input) = payload?;
    R::check(&input)?;

    let item = R::repository(&state).create(&input).await?;
    Ok(success_response(
        StatusCode::CREATED,
        &format!("{} created", R::NAME),
        item,
    ))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<ApiResult<R::Detail>, AppError> {
    let Path(raw) = id?;
    let id = parse_id(&raw)?;
    let Json(input) = payload?;
    R::check(&input)?;

    let item = R::repository(&state)
        .update(id, &input)
        .await
        .map_err(|e| not_found_as::<R>(e.into()))?;
    Ok(success_response(
        StatusCode::OK,
        &format!("{} updated", R::NAME),
        item,
    ))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiResult<()>, AppError> {
    let Path(raw) = id?;
    let id = parse_id(&raw)?;

    R::repository(&state)
        .delete(id)
        .await
        .map_err(|e| not_found_as::<R>(e.into()))?;
    Ok(message_response(
        StatusCode::OK,
        &format!("{} deleted", R::NAME),
    ))
}

/// Names the resource in generic not-found errors.
fn not_found_as<R: Resource>(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => AppError::NotFound(format!("{} not found", R::NAME)),
        other => other,
    }
}
