// src/db/restaurant_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::restaurant::Restaurant;

#[derive(Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Checagem de existência usada antes de criar locais.
    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // SELECT EXISTS para a consulta mais rápida possível.
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM restaurants WHERE id = $1)",
        )
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(exists)
    }

    /// Tranca a linha do restaurante (FOR UPDATE) dentro da transação do
    /// chamador. É isso que serializa as mutações de primário do MESMO
    /// restaurante; restaurantes diferentes seguem independentes.
    /// Devolve false se o restaurante não existe.
    pub async fn lock_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM restaurants WHERE id = $1 FOR UPDATE",
        )
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.is_some())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Restaurant>, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(restaurant)
    }

    pub async fn insert<'e, E>(&self, executor: E, name: &str) -> Result<Restaurant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            INSERT INTO restaurants (name)
            VALUES ($1)
            RETURNING *
            "#,
        )
            .bind(name)
            .fetch_one(executor)
            .await?;

        Ok(restaurant)
    }
}
