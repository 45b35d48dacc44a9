// tests/common/mod.rs
//
// Infra compartilhada dos testes de integração. Estes testes conversam
// com um Postgres real (DATABASE_URL) e por isso ficam atrás de
// #[ignore] — rode com `cargo test -- --ignored` com o banco de pé.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use restaurant_backend::db::{
    AssignmentRepository, LocationRepository, RestaurantRepository, RoleRepository,
    UserRepository,
};
use restaurant_backend::models::auth::User;
use restaurant_backend::models::location::{CreateLocationPayload, DaySchedule, OperatingHours};
use restaurant_backend::models::restaurant::Restaurant;
use restaurant_backend::models::role::Role;
use restaurant_backend::services::{
    AssignmentService, LocationService, RestaurantService, RoleService,
};

pub struct TestContext {
    pub pool: PgPool,
    pub restaurant_service: RestaurantService,
    pub location_service: LocationService,
    pub assignment_service: AssignmentService,
    pub role_service: RoleService,
    restaurant_repo: RestaurantRepository,
    user_repo: UserRepository,
    role_repo: RoleRepository,
}

impl TestContext {
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL deve apontar para o banco de teste");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Falha ao conectar no banco de teste");

        // Migrações são idempotentes: garantem o schema e o seed de cargos.
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("Falha ao rodar as migrações no banco de teste");

        let user_repo = UserRepository::new(pool.clone());
        let restaurant_repo = RestaurantRepository::new(pool.clone());
        let location_repo = LocationRepository::new(pool.clone());
        let assignment_repo = AssignmentRepository::new(pool.clone());
        let role_repo = RoleRepository::new(pool.clone());

        let restaurant_service = RestaurantService::new(
            restaurant_repo.clone(),
            location_repo.clone(),
            assignment_repo.clone(),
            role_repo.clone(),
            pool.clone(),
        );
        let location_service =
            LocationService::new(location_repo, restaurant_repo.clone(), pool.clone());
        let assignment_service = AssignmentService::new(assignment_repo, pool.clone());
        let role_service = RoleService::new(role_repo.clone(), pool.clone());

        Self {
            pool,
            restaurant_service,
            location_service,
            assignment_service,
            role_service,
            restaurant_repo,
            user_repo,
            role_repo,
        }
    }

    pub async fn create_restaurant(&self) -> Restaurant {
        let name = format!("Restaurante Teste {}", Uuid::new_v4());
        self.restaurant_repo
            .insert(&self.pool, &name)
            .await
            .expect("Falha ao criar restaurante de teste")
    }

    pub async fn create_user(&self) -> User {
        let email = format!("teste-{}@exemplo.com", Uuid::new_v4());
        self.user_repo
            .create_user(&self.pool, &email, "hash-de-teste")
            .await
            .expect("Falha ao criar usuário de teste")
    }

    pub async fn seeded_role(&self, name: &str) -> Role {
        self.role_repo
            .find_by_name(name)
            .await
            .expect("Falha ao consultar o catálogo de cargos")
            .expect("Cargo semeado ausente — as migrações rodaram?")
    }
}

fn dia_aberto(open: &str, close: &str) -> DaySchedule {
    DaySchedule {
        open: Some(open.to_string()),
        close: Some(close.to_string()),
        closed: false,
    }
}

fn dia_fechado() -> DaySchedule {
    DaySchedule { open: None, close: None, closed: true }
}

pub fn sample_hours() -> OperatingHours {
    OperatingHours {
        monday: dia_aberto("09:00", "22:00"),
        tuesday: dia_aberto("09:00", "22:00"),
        wednesday: dia_aberto("09:00", "22:00"),
        thursday: dia_aberto("09:00", "22:00"),
        friday: dia_aberto("09:00", "23:30"),
        saturday: dia_aberto("10:00", "23:30"),
        sunday: dia_fechado(),
        holidays: dia_fechado(),
    }
}

pub fn location_payload(slug: &str) -> CreateLocationPayload {
    CreateLocationPayload {
        name: format!("Unidade {}", slug),
        slug: slug.to_string(),
        address_street: "Rua das Flores, 100".into(),
        address_city: "São Paulo".into(),
        address_state: "SP".into(),
        address_postal_code: "01000-000".into(),
        address_country: "BR".into(),
        operating_hours: sample_hours(),
        features: vec!["delivery".into()],
        is_primary: false,
        status: None,
    }
}

/// Slug único por execução, para os testes não colidirem entre si.
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
