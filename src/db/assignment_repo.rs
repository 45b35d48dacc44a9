// src/db/assignment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::assignment::LocationAssignment;

#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_and_location<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<Option<LocationAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, LocationAssignment>(
            "SELECT * FROM location_assignments WHERE user_id = $1 AND location_id = $2",
        )
            .bind(user_id)
            .bind(location_id)
            .fetch_optional(executor)
            .await?;

        Ok(assignment)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        location_id: Uuid,
        role_id: Uuid,
        is_primary_location: bool,
        assigned_by: Option<Uuid>,
        stations: Option<&[String]>,
    ) -> Result<LocationAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, LocationAssignment>(
            r#"
            INSERT INTO location_assignments
                (user_id, location_id, role_id, is_primary_location, assigned_by, stations)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(user_id)
            .bind(location_id)
            .bind(role_id)
            .bind(is_primary_location)
            .bind(assigned_by)
            .bind(stations)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation(
                            "Este usuário já possui vínculo com este local.".into(),
                        );
                    }
                    // FK violada: traduz para o NotFound da entidade certa.
                    if db_err.is_foreign_key_violation() {
                        match db_err.constraint() {
                            Some("location_assignments_user_id_fkey") => return AppError::UserNotFound,
                            Some("location_assignments_location_id_fkey") => return AppError::LocationNotFound,
                            Some("location_assignments_role_id_fkey") => return AppError::RoleNotFound,
                            _ => {}
                        }
                    }
                }
                e.into()
            })?;

        Ok(assignment)
    }

    /// Tranca a linha do usuário (FOR UPDATE) dentro da transação do
    /// chamador. Serializa as mutações de vínculo primário do MESMO
    /// usuário. Devolve false se o usuário não existe.
    pub async fn lock_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE id = $1 FOR UPDATE",
        )
            .bind(user_id)
            .fetch_optional(executor)
            .await?;

        Ok(row.is_some())
    }

    pub async fn count_for_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM location_assignments WHERE user_id = $1",
        )
            .bind(user_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Re-concessão com cargo diferente: atualiza o role_id da linha
    /// existente em vez de inserir uma segunda (o par user+local é único).
    pub async fn update_role<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        location_id: Uuid,
        role_id: Uuid,
    ) -> Result<Option<LocationAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, LocationAssignment>(
            r#"
            UPDATE location_assignments
            SET role_id = $3, updated_at = now()
            WHERE user_id = $1 AND location_id = $2
            RETURNING *
            "#,
        )
            .bind(user_id)
            .bind(location_id)
            .bind(role_id)
            .fetch_optional(executor)
            .await?;

        Ok(assignment)
    }

    /// Fase 1 da eleição de vínculo primário: limpa a flag de todos os
    /// vínculos do usuário, exceto o alvo. Mesma transação da fase 2, sempre.
    pub async fn clear_primary_flags<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        except: Option<Uuid>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE location_assignments
            SET is_primary_location = false, updated_at = now()
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR location_id <> $2)
              AND is_primary_location = true
            "#,
        )
            .bind(user_id)
            .bind(except)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Fase 2: marca o par (usuário, local) como primário.
    /// Retorna 0 se o par não existe — o chamador PRECISA checar.
    pub async fn mark_primary<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE location_assignments
            SET is_primary_location = true, updated_at = now()
            WHERE user_id = $1 AND location_id = $2
            "#,
        )
            .bind(user_id)
            .bind(location_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM location_assignments WHERE user_id = $1 AND location_id = $2",
        )
            .bind(user_id)
            .bind(location_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Verifica se um usuário tem acesso a um local.
    /// Esta é a verificação de autorização mais usada pelos handlers.
    pub async fn user_has_location_access(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<bool, AppError> {
        // SELECT EXISTS para a consulta mais rápida possível.
        let has_access = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM location_assignments
                WHERE user_id = $1 AND location_id = $2
            )
            "#,
        )
            .bind(user_id)
            .bind(location_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(has_access)
    }

    /// Verifica se o usuário pertence ao restaurante (tem vínculo com
    /// pelo menos um local dele). Usado pelo guard de tenancy.
    pub async fn user_belongs_to_restaurant(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
    ) -> Result<bool, AppError> {
        let belongs = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM location_assignments la
                JOIN locations l ON la.location_id = l.id
                WHERE la.user_id = $1 AND l.restaurant_id = $2
            )
            "#,
        )
            .bind(user_id)
            .bind(restaurant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(belongs)
    }

    pub async fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<LocationAssignment>, AppError> {
        let assignments = sqlx::query_as::<_, LocationAssignment>(
            r#"
            SELECT * FROM location_assignments
            WHERE user_id = $1
            ORDER BY is_primary_location DESC, created_at ASC
            "#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(assignments)
    }
}
