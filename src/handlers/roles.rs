// src/handlers/roles.rs

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
    models::role::{CreateRolePayload, RoleScope, UpdateRolePayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRolesQuery {
    pub scope: Option<RoleScope>,
    #[serde(default)]
    pub admin_only: bool,
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = crate::models::role::Role),
        (status = 409, description = "Nome de cargo já existe"),
    ),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let role = app_state.role_service.create_role(payload).await?;

    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    get,
    path = "/api/roles",
    params(ListRolesQuery),
    responses(
        (status = 200, description = "Cargos ativos do catálogo", body = [crate::models::role::Role]),
    ),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    Query(query): Query<ListRolesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let roles = if query.admin_only {
        app_state.role_service.get_admin_roles().await?
    } else if let Some(scope) = query.scope {
        app_state.role_service.get_roles_by_scope(scope).await?
    } else {
        app_state.role_service.get_active_roles().await?
    };

    Ok((StatusCode::OK, Json(roles)))
}

#[utoipa::path(
    patch,
    path = "/api/roles/{id}",
    params(("id" = Uuid, Path, description = "ID do cargo")),
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Cargo atualizado", body = crate::models::role::Role),
        (status = 404, description = "Cargo não encontrado"),
    ),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let role = app_state.role_service.update_role(id, payload).await?;

    Ok((StatusCode::OK, Json(role)))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    params(("id" = Uuid, Path, description = "ID do cargo")),
    responses(
        (status = 200, description = "Cargo desativado (soft delete)", body = crate::models::role::Role),
        (status = 404, description = "Cargo não encontrado"),
    ),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn deactivate_role(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Soft delete: vínculos existentes seguem válidos.
    let role = app_state.role_service.deactivate_role(id).await?;

    Ok((StatusCode::OK, Json(role)))
}
