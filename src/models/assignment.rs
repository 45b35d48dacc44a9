// src/models/assignment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. LocationAssignment (A "Ponte" Usuário-Local-Cargo)
// ---
// Quem trabalha em qual unidade, com qual cargo. O par (user_id, location_id)
// é único; conceder de novo com outro cargo atualiza o role_id da linha
// existente em vez de inserir uma segunda.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub role_id: Uuid,

    // Exatamente um vínculo primário por usuário (a unidade "padrão" dele).
    pub is_primary_location: bool,

    // Quem concedeu o acesso, quando registrado.
    pub assigned_by: Option<Uuid>,

    // Estações de trabalho dentro da unidade (texto livre).
    #[schema(example = json!(["grill", "expo"]))]
    pub stations: Option<Vec<String>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignStaffPayload {
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub role_id: Uuid,

    #[serde(default)]
    pub is_primary_location: bool,

    #[validate(length(max = 20, message = "No máximo 20 estações por vínculo."))]
    pub stations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffLocationPayload {
    pub user_id: Uuid,
    pub location_id: Uuid,
}

// Opções do serviço ao conceder um vínculo.
#[derive(Debug, Default, Clone)]
pub struct AssignOptions {
    pub is_primary_location: bool,
    pub assigned_by: Option<Uuid>,
    pub stations: Option<Vec<String>>,
}
