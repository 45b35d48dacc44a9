// tests/role_catalog.rs
//
// Catálogo global de cargos: unicidade de nome, limites de nível e o
// soft delete que preserva os vínculos existentes.

mod common;

use common::{location_payload, unique_slug, TestContext};
use restaurant_backend::common::error::AppError;
use restaurant_backend::models::assignment::AssignOptions;
use restaurant_backend::models::role::{CreateRolePayload, RoleScope, UpdateRolePayload};
use uuid::Uuid;

fn role_payload(name: &str) -> CreateRolePayload {
    CreateRolePayload {
        name: name.to_string(),
        display_name: format!("Cargo {}", name),
        description: None,
        level: 2,
        scope: RoleScope::Location,
        is_admin_role: false,
        can_manage_users: false,
        can_manage_locations: false,
    }
}

fn unique_role_name() -> String {
    format!("cargo-{}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn nome_de_cargo_e_unico() {
    let ctx = TestContext::new().await;
    let name = unique_role_name();

    ctx.role_service.create_role(role_payload(&name)).await.unwrap();

    let err = ctx
        .role_service
        .create_role(role_payload(&name))
        .await
        .expect_err("nome duplicado deveria falhar");
    assert!(matches!(err, AppError::RoleNameAlreadyExists(_)));
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn atualizacao_administrativa_preserva_o_nome() {
    let ctx = TestContext::new().await;
    let name = unique_role_name();
    let role = ctx.role_service.create_role(role_payload(&name)).await.unwrap();

    let updated = ctx
        .role_service
        .update_role(
            role.id,
            UpdateRolePayload {
                display_name: Some("Cargo Renomeado".into()),
                level: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, name, "o nome é imutável");
    assert_eq!(updated.display_name, "Cargo Renomeado");
    assert_eq!(updated.level, 4);
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn soft_delete_nao_invalida_vinculos_existentes() {
    let ctx = TestContext::new().await;

    let restaurant = ctx.create_restaurant().await;
    let location = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("l")))
        .await
        .unwrap();
    let user = ctx.create_user().await;

    let role = ctx
        .role_service
        .create_role(role_payload(&unique_role_name()))
        .await
        .unwrap();

    let assignment = ctx
        .assignment_service
        .assign(user.id, location.id, role.id, AssignOptions::default())
        .await
        .unwrap();

    // Desativa o cargo: a linha continua no banco, só muda is_active
    let deactivated = ctx.role_service.deactivate_role(role.id).await.unwrap();
    assert!(!deactivated.is_active);

    // O vínculo existente segue apontando para o cargo, intacto
    let assignments = ctx.assignment_service.list_for_user(user.id).await.unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].id, assignment.id);
    assert_eq!(assignments[0].role_id, role.id);

    // E o cargo sai das listagens de ativos
    let active = ctx.role_service.get_active_roles().await.unwrap();
    assert!(active.iter().all(|r| r.id != role.id));
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn listagens_por_escopo_e_admin() {
    let ctx = TestContext::new().await;

    // Do seed: 'owner' é admin de escopo restaurant, 'server' é location
    let by_scope = ctx
        .role_service
        .get_roles_by_scope(RoleScope::Restaurant)
        .await
        .unwrap();
    assert!(by_scope.iter().any(|r| r.name == "owner"));
    assert!(by_scope.iter().all(|r| matches!(r.scope, RoleScope::Restaurant)));

    let admins = ctx.role_service.get_admin_roles().await.unwrap();
    assert!(admins.iter().any(|r| r.name == "owner"));
    assert!(admins.iter().all(|r| r.is_admin_role));

    let found = ctx.role_service.find_by_name("server").await.unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().level, 2);
}
