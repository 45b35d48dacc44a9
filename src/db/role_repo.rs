// src/db/role_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::role::{CreateRolePayload, Role, RoleScope, UpdateRolePayload};

#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Role>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(role)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = lower($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    pub async fn insert<'e, E>(&self, executor: E, data: &CreateRolePayload) -> Result<Role, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (
                name, display_name, description, level, scope,
                is_admin_role, can_manage_users, can_manage_locations
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
            .bind(&data.name)
            .bind(&data.display_name)
            .bind(data.description.as_deref())
            .bind(data.level)
            .bind(data.scope)
            .bind(data.is_admin_role)
            .bind(data.can_manage_users)
            .bind(data.can_manage_locations)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::RoleNameAlreadyExists(data.name.clone());
                    }
                }
                e.into()
            })?;

        Ok(role)
    }

    /// Edição administrativa, rara: o nome é imutável (vínculos e
    /// integrações referenciam o cargo por nome e id).
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &UpdateRolePayload,
    ) -> Result<Option<Role>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles SET
                display_name = COALESCE($2, display_name),
                description = COALESCE($3, description),
                level = COALESCE($4, level),
                is_admin_role = COALESCE($5, is_admin_role),
                can_manage_users = COALESCE($6, can_manage_users),
                can_manage_locations = COALESCE($7, can_manage_locations),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(data.display_name.as_deref())
            .bind(data.description.as_deref())
            .bind(data.level)
            .bind(data.is_admin_role)
            .bind(data.can_manage_users)
            .bind(data.can_manage_locations)
            .fetch_optional(executor)
            .await?;

        Ok(role)
    }

    /// Soft delete: cargos nunca são removidos fisicamente porque os
    /// vínculos de equipe guardam referência durável ao role_id.
    pub async fn soft_delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Role>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET is_active = false, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(role)
    }

    pub async fn list_active(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE is_active = true ORDER BY level DESC, name ASC",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    pub async fn list_by_scope(&self, scope: RoleScope) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT * FROM roles
            WHERE scope = $1 AND is_active = true
            ORDER BY level DESC, name ASC
            "#,
        )
            .bind(scope)
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    pub async fn list_admin_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT * FROM roles
            WHERE is_admin_role = true AND is_active = true
            ORDER BY level DESC, name ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }
}
