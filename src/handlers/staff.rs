// src/handlers/staff.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::RestaurantContext},
    models::assignment::{AssignOptions, AssignStaffPayload, StaffLocationPayload},
};

// Confere que o local alvo pertence ao restaurante do cabeçalho.
async fn ensure_location_in_restaurant(
    app_state: &AppState,
    restaurant_id: uuid::Uuid,
    location_id: uuid::Uuid,
) -> Result<(), AppError> {
    let location = app_state.location_service.get_location(location_id).await?;
    if location.restaurant_id != restaurant_id {
        return Err(AppError::LocationNotFound);
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/restaurants/staff",
    request_body = AssignStaffPayload,
    responses(
        (status = 201, description = "Vínculo concedido (idempotente)", body = crate::models::assignment::LocationAssignment),
        (status = 404, description = "Local ou cargo não encontrado"),
    ),
    security(("api_jwt" = [])),
    tag = "Staff"
)]
pub async fn assign_staff(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    granter: AuthenticatedUser,
    Json(payload): Json<AssignStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    ensure_location_in_restaurant(&app_state, restaurant.0, payload.location_id).await?;

    // A legalidade do cargo é checada AQUI, na borda: o serviço de
    // vínculos aceita qualquer role_id. Cargo desativado não pode mais
    // ser concedido.
    let role = app_state
        .role_service
        .find_by_id(payload.role_id)
        .await?
        .ok_or(AppError::RoleNotFound)?;
    if !role.is_active {
        return Err(AppError::RoleNotFound);
    }

    let assignment = app_state
        .assignment_service
        .assign(
            payload.user_id,
            payload.location_id,
            payload.role_id,
            AssignOptions {
                is_primary_location: payload.is_primary_location,
                assigned_by: Some(granter.0.id),
                stations: payload.stations,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    post,
    path = "/api/restaurants/staff/primary",
    request_body = StaffLocationPayload,
    responses(
        (status = 200, description = "Local primário do usuário trocado"),
        (status = 404, description = "Vínculo inexistente"),
    ),
    security(("api_jwt" = [])),
    tag = "Staff"
)]
pub async fn set_staff_primary_location(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    Json(payload): Json<StaffLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    ensure_location_in_restaurant(&app_state, restaurant.0, payload.location_id).await?;

    // O serviço devolve false quando o par não existe — aqui isso vira 404.
    let switched = app_state
        .assignment_service
        .set_primary_location(payload.user_id, payload.location_id)
        .await?;

    if !switched {
        return Err(AppError::AssignmentNotFound);
    }

    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/staff",
    request_body = StaffLocationPayload,
    responses(
        (status = 204, description = "Vínculo revogado"),
        (status = 404, description = "Vínculo inexistente"),
    ),
    security(("api_jwt" = [])),
    tag = "Staff"
)]
pub async fn revoke_staff(
    State(app_state): State<AppState>,
    restaurant: RestaurantContext,
    Json(payload): Json<StaffLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    ensure_location_in_restaurant(&app_state, restaurant.0, payload.location_id).await?;

    let removed = app_state
        .assignment_service
        .remove(payload.user_id, payload.location_id)
        .await?;

    if !removed {
        return Err(AppError::AssignmentNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/restaurants/staff/me",
    responses(
        (status = 200, description = "Vínculos do usuário autenticado (primário primeiro)", body = [crate::models::assignment::LocationAssignment]),
    ),
    security(("api_jwt" = [])),
    tag = "Staff"
)]
pub async fn my_assignments(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let assignments = app_state.assignment_service.list_for_user(user.0.id).await?;

    Ok((StatusCode::OK, Json(assignments)))
}
