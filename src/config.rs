// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AssignmentRepository, LocationRepository, RestaurantRepository, RoleRepository,
        UserRepository,
    },
    services::{
        AssignmentService, AuthService, LocationService, RestaurantService, RoleService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub restaurant_service: RestaurantService,
    pub location_service: LocationService,
    pub assignment_service: AssignmentService,
    pub role_service: RoleService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let restaurant_repo = RestaurantRepository::new(db_pool.clone());
        let location_repo = LocationRepository::new(db_pool.clone());
        let assignment_repo = AssignmentRepository::new(db_pool.clone());
        let role_repo = RoleRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());
        let restaurant_service = RestaurantService::new(
            restaurant_repo.clone(),
            location_repo.clone(),
            assignment_repo.clone(),
            role_repo.clone(),
            db_pool.clone(),
        );
        let location_service =
            LocationService::new(location_repo, restaurant_repo, db_pool.clone());
        let assignment_service = AssignmentService::new(assignment_repo, db_pool.clone());
        let role_service = RoleService::new(role_repo, db_pool.clone());

        // Retorna Ok com o estado montado
        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            restaurant_service,
            location_service,
            assignment_service,
            role_service,
        })
    }
}
