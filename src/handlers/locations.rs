// src/handlers/locations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::RestaurantContext,
    models::location::{CreateLocationPayload, LocationStatus, UpdateLocationPayload},
};

// Filtro opcional de status na listagem
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLocationsQuery {
    pub status: Option<LocationStatus>,
}

// Confere que o local pertence ao restaurante do cabeçalho — um tenant
// não pode mexer nos locais de outro.
async fn ensure_location_in_restaurant(
    app_state: &AppState,
    restaurant_id: Uuid,
    location_id: Uuid,
) -> Result<(), AppError> {
    let location = app_state.location_service.get_location(location_id).await?;
    if location.restaurant_id != restaurant_id {
        return Err(AppError::LocationNotFound);
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/restaurants/locations",
    request_body = CreateLocationPayload,
    responses(
        (status = 201, description = "Local criado", body = crate::models::location::Location),
        (status = 409, description = "Slug já em uso no restaurante"),
    ),
    security(("api_jwt" = [])),
    tag = "Locations"
)]
pub async fn create_location(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    Json(payload): Json<CreateLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let location = app_state
        .location_service
        .create_location(restaurant.0, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(location)))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/locations",
    params(ListLocationsQuery),
    responses(
        (status = 200, description = "Locais do restaurante (primário primeiro)", body = [crate::models::location::Location]),
    ),
    security(("api_jwt" = [])),
    tag = "Locations"
)]
pub async fn list_locations(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    Query(query): Query<ListLocationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let locations = app_state
        .location_service
        .list_locations(restaurant.0, query.status)
        .await?;

    Ok((StatusCode::OK, Json(locations)))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/locations/primary",
    responses(
        (status = 200, description = "O local primário do restaurante", body = crate::models::location::Location),
        (status = 404, description = "Restaurante sem local primário"),
    ),
    security(("api_jwt" = [])),
    tag = "Locations"
)]
pub async fn get_primary_location(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
) -> Result<impl IntoResponse, AppError> {
    let location = app_state
        .location_service
        .get_primary(restaurant.0)
        .await?
        .ok_or(AppError::LocationNotFound)?;

    Ok((StatusCode::OK, Json(location)))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/locations/stats",
    responses(
        (status = 200, description = "Contagens de locais por status", body = crate::models::location::LocationStats),
    ),
    security(("api_jwt" = [])),
    tag = "Locations"
)]
pub async fn location_stats(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.location_service.location_stats(restaurant.0).await?;

    Ok((StatusCode::OK, Json(stats)))
}

#[utoipa::path(
    patch,
    path = "/api/restaurants/locations/{id}",
    params(("id" = Uuid, Path, description = "ID do local")),
    request_body = UpdateLocationPayload,
    responses(
        (status = 200, description = "Local atualizado", body = crate::models::location::Location),
        (status = 404, description = "Local não encontrado"),
        (status = 409, description = "Slug já em uso"),
    ),
    security(("api_jwt" = [])),
    tag = "Locations"
)]
pub async fn update_location(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    ensure_location_in_restaurant(&app_state, restaurant.0, id).await?;

    let location = app_state.location_service.update_location(id, payload).await?;

    Ok((StatusCode::OK, Json(location)))
}

#[utoipa::path(
    post,
    path = "/api/restaurants/locations/{id}/primary",
    params(("id" = Uuid, Path, description = "ID do local")),
    responses(
        (status = 200, description = "Local promovido a primário", body = crate::models::location::Location),
        (status = 404, description = "Local não encontrado"),
    ),
    security(("api_jwt" = [])),
    tag = "Locations"
)]
pub async fn set_primary_location(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_location_in_restaurant(&app_state, restaurant.0, id).await?;

    let location = app_state.location_service.set_primary(id).await?;

    Ok((StatusCode::OK, Json(location)))
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/locations/{id}",
    params(("id" = Uuid, Path, description = "ID do local")),
    responses(
        (status = 204, description = "Local removido (primário re-eleito se preciso)"),
        (status = 404, description = "Local não encontrado"),
        (status = 422, description = "Único local do restaurante"),
    ),
    security(("api_jwt" = [])),
    tag = "Locations"
)]
pub async fn delete_location(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_location_in_restaurant(&app_state, restaurant.0, id).await?;

    app_state.location_service.delete_location(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
