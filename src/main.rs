// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use restaurant_backend::config::AppState;
use restaurant_backend::docs::ApiDoc;
use restaurant_backend::handlers;
use restaurant_backend::middleware::auth::auth_guard;
use restaurant_backend::middleware::tenancy::restaurant_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware de auth)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Criação de restaurante: basta estar autenticado (o tenant nasce aqui)
    let restaurant_routes = Router::new()
        .route("/", post(handlers::restaurants::create_restaurant))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas de locais: exigem o cabeçalho X-Restaurant-ID + vínculo
    let location_routes = Router::new()
        .route("/"
               , post(handlers::locations::create_location)
               .get(handlers::locations::list_locations)
        )
        .route("/primary", get(handlers::locations::get_primary_location))
        .route("/stats", get(handlers::locations::location_stats))
        .route("/{id}"
               , patch(handlers::locations::update_location)
               .delete(handlers::locations::delete_location)
        )
        .route("/{id}/primary", post(handlers::locations::set_primary_location))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            restaurant_guard,
        ));

    // Rotas de equipe (vínculos usuário x local x cargo)
    let staff_routes = Router::new()
        .route("/"
               , post(handlers::staff::assign_staff)
               .delete(handlers::staff::revoke_staff)
        )
        .route("/primary", post(handlers::staff::set_staff_primary_location))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            restaurant_guard,
        ));

    // "Meus vínculos" não depende de tenant: só de autenticação
    let my_staff_routes = Router::new()
        .route("/me", get(handlers::staff::my_assignments))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Catálogo de cargos (administrativo)
    let role_routes = Router::new()
        .route("/"
               , post(handlers::roles::create_role)
               .get(handlers::roles::list_roles)
        )
        .route("/{id}"
               , patch(handlers::roles::update_role)
               .delete(handlers::roles::deactivate_role)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/restaurants", restaurant_routes)
        .nest("/api/restaurants/locations", location_routes)
        .nest("/api/restaurants/staff", staff_routes)
        .nest("/api/restaurants/staff", my_staff_routes)
        .nest("/api/roles", role_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
