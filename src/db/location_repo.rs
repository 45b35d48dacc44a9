// src/db/location_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::location::{
    CreateLocationPayload, Location, LocationStats, LocationStatus, UpdateLocationPayload,
};

#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let location = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(location)
    }

    /// Verifica se um slug já está em uso no restaurante, ignorando
    /// maiúsculas/minúsculas. `exclude` permite pular a própria linha
    /// durante um update.
    pub async fn slug_in_use<'e, E>(
        &self,
        executor: E,
        restaurant_id: Uuid,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // SELECT EXISTS para a consulta mais rápida possível.
        let in_use = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM locations
                WHERE restaurant_id = $1
                  AND lower(slug) = lower($2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
            .bind(restaurant_id)
            .bind(slug)
            .bind(exclude)
            .fetch_one(executor)
            .await?;

        Ok(in_use)
    }

    pub async fn count_by_restaurant<'e, E>(
        &self,
        executor: E,
        restaurant_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM locations WHERE restaurant_id = $1",
        )
            .bind(restaurant_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        restaurant_id: Uuid,
        data: &CreateLocationPayload,
        is_primary: bool,
        status: LocationStatus,
    ) -> Result<Location, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (
                restaurant_id, name, slug,
                address_street, address_city, address_state,
                address_postal_code, address_country,
                operating_hours, features, status, is_primary
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
            .bind(restaurant_id)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.address_street)
            .bind(&data.address_city)
            .bind(&data.address_state)
            .bind(&data.address_postal_code)
            .bind(&data.address_country)
            .bind(sqlx::types::Json(&data.operating_hours))
            .bind(&data.features)
            .bind(status)
            .bind(is_primary)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        if let Some(constraint) = db_err.constraint() {
                            return match constraint {
                                // O índice (restaurant_id, lower(slug)) da migration
                                "idx_locations_slug" => AppError::SlugAlreadyExists(data.slug.clone()),

                                // Fallback (ex.: corrida no índice parcial de primário)
                                _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                            };
                        }
                    }
                }
                e.into()
            })?;

        Ok(location)
    }

    /// Atualização parcial: campos None ficam como estão (COALESCE).
    /// Retorna None se a linha sumiu entre a leitura e a escrita — o
    /// chamador decide o que fazer com essa corrida.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &UpdateLocationPayload,
        is_primary: Option<bool>,
    ) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let location = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                address_street = COALESCE($4, address_street),
                address_city = COALESCE($5, address_city),
                address_state = COALESCE($6, address_state),
                address_postal_code = COALESCE($7, address_postal_code),
                address_country = COALESCE($8, address_country),
                operating_hours = COALESCE($9, operating_hours),
                features = COALESCE($10, features),
                status = COALESCE($11, status),
                is_primary = COALESCE($12, is_primary),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(data.name.as_deref())
            .bind(data.slug.as_deref())
            .bind(data.address_street.as_deref())
            .bind(data.address_city.as_deref())
            .bind(data.address_state.as_deref())
            .bind(data.address_postal_code.as_deref())
            .bind(data.address_country.as_deref())
            .bind(data.operating_hours.as_ref().map(sqlx::types::Json))
            .bind(data.features.as_deref())
            .bind(data.status)
            .bind(is_primary)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        if let Some(constraint) = db_err.constraint() {
                            return match constraint {
                                "idx_locations_slug" => {
                                    AppError::SlugAlreadyExists(data.slug.clone().unwrap_or_default())
                                }
                                _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                            };
                        }
                    }
                }
                e.into()
            })?;

        Ok(location)
    }

    /// Fase 1 da eleição de primário: limpa a flag de todos os locais do
    /// restaurante, exceto o alvo. SEMPRE deve rodar na mesma transação
    /// que a fase 2 (mark_primary).
    pub async fn clear_primary_flags<'e, E>(
        &self,
        executor: E,
        restaurant_id: Uuid,
        except: Option<Uuid>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE locations
            SET is_primary = false, updated_at = now()
            WHERE restaurant_id = $1
              AND ($2::uuid IS NULL OR id <> $2)
              AND is_primary = true
            "#,
        )
            .bind(restaurant_id)
            .bind(except)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Fase 2 da eleição: marca o alvo como primário.
    pub async fn mark_primary<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE locations SET is_primary = true, updated_at = now() WHERE id = $1",
        )
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Escolhe o substituto determinístico para a promoção a primário:
    /// locais ativos primeiro, depois o mais antigo. O local sendo
    /// removido/rebaixado é excluído da eleição.
    pub async fn election_candidate<'e, E>(
        &self,
        executor: E,
        restaurant_id: Uuid,
        exclude: Uuid,
    ) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let candidate = sqlx::query_as::<_, Location>(
            r#"
            SELECT * FROM locations
            WHERE restaurant_id = $1 AND id <> $2
            ORDER BY (status = 'active') DESC, created_at ASC
            LIMIT 1
            "#,
        )
            .bind(restaurant_id)
            .bind(exclude)
            .fetch_optional(executor)
            .await?;

        Ok(candidate)
    }

    pub async fn find_primary(&self, restaurant_id: Uuid) -> Result<Option<Location>, AppError> {
        let location = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE restaurant_id = $1 AND is_primary = true",
        )
            .bind(restaurant_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }

    /// Lista os locais do restaurante: primário primeiro, depois por ordem
    /// de criação. Filtro de status opcional.
    pub async fn find_all_by_restaurant(
        &self,
        restaurant_id: Uuid,
        status: Option<LocationStatus>,
    ) -> Result<Vec<Location>, AppError> {
        let locations = sqlx::query_as::<_, Location>(
            r#"
            SELECT * FROM locations
            WHERE restaurant_id = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY is_primary DESC, created_at ASC
            "#,
        )
            .bind(restaurant_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(locations)
    }

    pub async fn stats(&self, restaurant_id: Uuid) -> Result<LocationStats, AppError> {
        let stats = sqlx::query_as::<_, LocationStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE status = 'inactive') AS inactive
            FROM locations
            WHERE restaurant_id = $1
            "#,
        )
            .bind(restaurant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(stats)
    }
}
