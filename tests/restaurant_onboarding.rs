// tests/restaurant_onboarding.rs
//
// A criação de um restaurante é tudo-ou-nada: tenant + primeiro local
// (primário de nascença) + vínculo do dono, numa única transação.

mod common;

use common::{location_payload, unique_slug, TestContext};

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn restaurante_nasce_com_local_primario_e_dono() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user().await;

    let (restaurant, location) = ctx
        .restaurant_service
        .create_restaurant_with_owner(
            "Cantina da Nonna",
            location_payload(&unique_slug("matriz")),
            owner.id,
        )
        .await
        .expect("Falha na criação transacional do restaurante");

    // O restaurante existe e o local é o primário dele
    assert!(ctx.restaurant_service.restaurant_exists(restaurant.id).await.unwrap());
    assert!(location.is_primary);
    assert_eq!(location.restaurant_id, restaurant.id);

    let primary = ctx
        .location_service
        .get_primary(restaurant.id)
        .await
        .unwrap()
        .expect("restaurante nasceu sem primário");
    assert_eq!(primary.id, location.id);

    // O dono saiu da transação com vínculo primário no local
    let assignments = ctx.assignment_service.list_for_user(owner.id).await.unwrap();
    assert_eq!(assignments.len(), 1);
    assert!(assignments[0].is_primary_location);
    assert_eq!(assignments[0].location_id, location.id);

    let owner_role = ctx.seeded_role("owner").await;
    assert_eq!(assignments[0].role_id, owner_role.id);

    // E tem acesso ao local
    assert!(ctx
        .assignment_service
        .user_has_location_access(owner.id, location.id)
        .await
        .unwrap());
}
