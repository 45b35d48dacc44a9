// src/services/role_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RoleRepository,
    models::role::{CreateRolePayload, Role, RoleScope, UpdateRolePayload},
};

// Catálogo global de cargos: leitura frequente, escrita administrativa rara.
#[derive(Clone)]
pub struct RoleService {
    repo: RoleRepository,
    pool: sqlx::PgPool,
}

impl RoleService {
    pub fn new(repo: RoleRepository, pool: sqlx::PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_role(&self, data: CreateRolePayload) -> Result<Role, AppError> {
        // Pré-checagem amigável; o UNIQUE do banco cobre a corrida.
        if self.repo.find_by_name(&data.name).await?.is_some() {
            return Err(AppError::RoleNameAlreadyExists(data.name));
        }

        let role = self.repo.insert(&self.pool, &data).await?;

        tracing::info!("🏷️ Cargo '{}' criado (nível {})", role.name, role.level);
        Ok(role)
    }

    pub async fn update_role(&self, id: Uuid, data: UpdateRolePayload) -> Result<Role, AppError> {
        self.repo
            .update(&self.pool, id, &data)
            .await?
            .ok_or(AppError::RoleNotFound)
    }

    /// Desativa o cargo sem removê-lo: vínculos existentes continuam
    /// apontando para ele e NÃO são invalidados retroativamente.
    pub async fn deactivate_role(&self, id: Uuid) -> Result<Role, AppError> {
        let role = self.repo
            .soft_delete(&self.pool, id)
            .await?
            .ok_or(AppError::RoleNotFound)?;

        tracing::info!("🚫 Cargo '{}' desativado", role.name);
        Ok(role)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        self.repo.find_by_name(name).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        self.repo.find_by_id(&self.pool, id).await
    }

    pub async fn get_active_roles(&self) -> Result<Vec<Role>, AppError> {
        self.repo.list_active().await
    }

    pub async fn get_roles_by_scope(&self, scope: RoleScope) -> Result<Vec<Role>, AppError> {
        self.repo.list_by_scope(scope).await
    }

    pub async fn get_admin_roles(&self) -> Result<Vec<Role>, AppError> {
        self.repo.list_admin_roles().await
    }
}
