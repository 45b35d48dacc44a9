// src/handlers/restaurants.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::restaurant::{CreateRestaurantPayload, RestaurantCreatedResponse},
};

#[utoipa::path(
    post,
    path = "/api/restaurants",
    request_body = CreateRestaurantPayload,
    responses(
        (status = 201, description = "Restaurante criado com o primeiro local", body = RestaurantCreatedResponse),
        (status = 400, description = "Payload inválido"),
    ),
    security(("api_jwt" = [])),
    tag = "Restaurants"
)]
pub async fn create_restaurant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateRestaurantPayload>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validar o payload (inclui o primeiro local, aninhado)
    payload.validate()?;

    // 2. Operação transacional: restaurante + local primário + vínculo do dono
    let (restaurant, primary_location) = app_state
        .restaurant_service
        .create_restaurant_with_owner(&payload.name, payload.first_location, user.0.id)
        .await?;

    // 3. Responder com sucesso
    Ok((
        StatusCode::CREATED,
        Json(RestaurantCreatedResponse { restaurant, primary_location }),
    ))
}
