// src/models/restaurant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::location::CreateLocationPayload;

// ---
// 1. Restaurant (O "Tenant")
// ---
// A conta principal. Todo restaurante nasce com pelo menos um local:
// a criação é transacional (restaurante + primeiro local + vínculo do dono).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantPayload {
    #[validate(length(min = 1, max = 120, message = "O nome do restaurante é obrigatório."))]
    #[schema(example = "Cantina da Nonna")]
    pub name: String,

    // O primeiro local é obrigatório: um restaurante nunca existe sem local.
    #[validate(nested)]
    pub first_location: CreateLocationPayload,
}

// Resposta da criação: o tenant e o seu local primário recém-criado.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreatedResponse {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub primary_location: crate::models::location::Location,
}
