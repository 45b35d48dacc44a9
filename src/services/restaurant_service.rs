// src/services/restaurant_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AssignmentRepository, LocationRepository, RestaurantRepository, RoleRepository},
    models::{
        location::{CreateLocationPayload, Location, LocationStatus},
        restaurant::Restaurant,
    },
};

#[derive(Clone)]
pub struct RestaurantService {
    restaurant_repo: RestaurantRepository,
    location_repo: LocationRepository,
    assignment_repo: AssignmentRepository,
    role_repo: RoleRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl RestaurantService {
    pub fn new(
        restaurant_repo: RestaurantRepository,
        location_repo: LocationRepository,
        assignment_repo: AssignmentRepository,
        role_repo: RoleRepository,
        pool: PgPool,
    ) -> Self {
        Self { restaurant_repo, location_repo, assignment_repo, role_repo, pool }
    }

    /// LÓGICA DE NEGÓCIO: um restaurante nunca existe sem local. A criação
    /// é uma unidade atômica: o tenant, o seu primeiro local (primário de
    /// nascença) e o vínculo do criador como dono — tudo ou nada.
    pub async fn create_restaurant_with_owner(
        &self,
        name: &str,
        first_location: CreateLocationPayload,
        owner_id: Uuid,
    ) -> Result<(Restaurant, Location), AppError> {
        // O cargo 'owner' vem do catálogo semeado. Leitura fora da
        // transação: é só consulta, não quebra a lógica crítica.
        let owner_role = self.role_repo
            .find_by_name("owner")
            .await?
            .ok_or(AppError::RoleNotFound)?;

        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria o Restaurante (Tenant)
        let restaurant = self.restaurant_repo.insert(&mut *tx, name).await?;

        // 3. Cria o primeiro local, já primário
        let status = first_location.status.unwrap_or(LocationStatus::Active);
        let location = self.location_repo
            .insert(&mut *tx, restaurant.id, &first_location, true, status)
            .await?;

        // 4. Vincula o criador como dono, com este local como primário dele
        self.assignment_repo
            .insert(
                &mut *tx,
                owner_id,
                location.id,
                owner_role.id,
                true,
                Some(owner_id),
                None,
            )
            .await?;

        // 5. Commit
        tx.commit().await?;

        tracing::info!("🎉 Restaurante '{}' criado com o local '{}'", restaurant.name, location.slug);
        Ok((restaurant, location))
    }

    pub async fn restaurant_exists(&self, id: Uuid) -> Result<bool, AppError> {
        self.restaurant_repo.exists(&self.pool, id).await
    }

    pub async fn get_restaurant(&self, id: Uuid) -> Result<Restaurant, AppError> {
        self.restaurant_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::RestaurantNotFound)
    }
}
