// src/models/role.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ---
// 1. Escopo do Cargo
// ---
// Define a abrangência do cargo: plataforma inteira, um restaurante
// ou uma unidade específica. Guardado como TEXT no banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleScope {
    System,
    Restaurant,
    Location,
}

// ---
// 2. Role (O que sai do banco)
// ---
// Catálogo global: cargos não pertencem a nenhum restaurante e nunca são
// removidos fisicamente, apenas desativados (os vínculos guardam role_id).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "manager")]
    pub name: String,

    #[schema(example = "Gerente")]
    pub display_name: String,

    #[schema(example = "Gestão da operação de uma unidade")]
    pub description: Option<String>,

    // Nível hierárquico de 1 (mínimo) a 5 (máximo).
    #[schema(example = 4)]
    pub level: i16,

    pub scope: RoleScope,

    pub is_admin_role: bool,
    pub can_manage_users: bool,
    pub can_manage_locations: bool,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O nome do cargo segue a mesma regra de slug: minúsculas, dígitos, hífens.
pub fn validate_role_name(name: &str) -> Result<(), ValidationError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("name");
        err.message = Some("O nome do cargo deve ser minúsculo, sem espaços ou acentos.".into());
        Err(err)
    }
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(length(min = 1, max = 60, message = "O nome do cargo é obrigatório."), custom(function = validate_role_name))]
    #[schema(example = "sous-chef")]
    pub name: String,

    #[validate(length(min = 1, max = 120, message = "O nome de exibição é obrigatório."))]
    #[schema(example = "Sous Chef")]
    pub display_name: String,

    pub description: Option<String>,

    #[validate(range(min = 1, max = 5, message = "O nível deve estar entre 1 e 5."))]
    #[schema(example = 3)]
    pub level: i16,

    pub scope: RoleScope,

    #[serde(default)]
    pub is_admin_role: bool,
    #[serde(default)]
    pub can_manage_users: bool,
    #[serde(default)]
    pub can_manage_locations: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePayload {
    #[validate(length(min = 1, max = 120, message = "O nome de exibição não pode ser vazio."))]
    pub display_name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 1, max = 5, message = "O nível deve estar entre 1 e 5."))]
    pub level: Option<i16>,

    pub is_admin_role: Option<bool>,
    pub can_manage_users: Option<bool>,
    pub can_manage_locations: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nome_de_cargo_valido_passa() {
        assert!(validate_role_name("sous-chef").is_ok());
        assert!(validate_role_name("barista_senior").is_ok());
    }

    #[test]
    fn nome_de_cargo_invalido_falha() {
        assert!(validate_role_name("Sous Chef").is_err());
        assert!(validate_role_name("gerênte").is_err());
        assert!(validate_role_name("").is_err());
    }

    #[test]
    fn nivel_fora_dos_limites_falha_na_validacao() {
        let payload = CreateRolePayload {
            name: "teste".into(),
            display_name: "Teste".into(),
            description: None,
            level: 6,
            scope: RoleScope::Location,
            is_admin_role: false,
            can_manage_users: false,
            can_manage_locations: false,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn escopo_desserializa_em_minusculas() {
        let scope: RoleScope = serde_json::from_str("\"restaurant\"").unwrap();
        assert_eq!(scope, RoleScope::Restaurant);
        assert!(serde_json::from_str::<RoleScope>("\"global\"").is_err());
    }
}
