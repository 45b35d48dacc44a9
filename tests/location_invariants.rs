// tests/location_invariants.rs
//
// A invariante central: todo restaurante com pelo menos um local tem
// EXATAMENTE um primário, sob qualquer sequência de operações.

mod common;

use common::{location_payload, unique_slug, TestContext};
use restaurant_backend::common::error::AppError;
use restaurant_backend::models::location::UpdateLocationPayload;
use uuid::Uuid;

async fn count_primaries(ctx: &TestContext, restaurant_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM locations WHERE restaurant_id = $1 AND is_primary = true",
    )
    .bind(restaurant_id)
    .fetch_one(&ctx.pool)
    .await
    .expect("Falha ao contar primários")
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn primeiro_local_nasce_primario_mesmo_sem_pedir() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    // Payload pede explicitamente is_primary = false
    let payload = location_payload(&unique_slug("centro"));
    assert!(!payload.is_primary);

    let location = ctx
        .location_service
        .create_location(restaurant.id, payload)
        .await
        .expect("Falha ao criar o primeiro local");

    assert!(location.is_primary, "o primeiro local deve nascer primário");
    assert_eq!(count_primaries(&ctx, restaurant.id).await, 1);
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn criar_local_primario_rebaixa_o_anterior() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    let first = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("a")))
        .await
        .unwrap();

    let mut payload = location_payload(&unique_slug("b"));
    payload.is_primary = true;
    let second = ctx
        .location_service
        .create_location(restaurant.id, payload)
        .await
        .unwrap();

    assert!(second.is_primary);
    assert_eq!(count_primaries(&ctx, restaurant.id).await, 1);

    let primary = ctx
        .location_service
        .get_primary(restaurant.id)
        .await
        .unwrap()
        .expect("restaurante ficou sem primário");
    assert_eq!(primary.id, second.id);
    assert_ne!(primary.id, first.id);
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn slug_conflita_ignorando_caixa() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    let slug = unique_slug("centro");
    ctx.location_service
        .create_location(restaurant.id, location_payload(&slug))
        .await
        .unwrap();

    // Mesmo slug, caixa diferente: o serviço compara com lower()
    let mut clashing = location_payload(&slug);
    clashing.slug = slug.to_uppercase();
    let err = ctx
        .location_service
        .create_location(restaurant.id, clashing)
        .await
        .expect_err("slug duplicado deveria falhar");

    assert!(matches!(err, AppError::SlugAlreadyExists(_)));
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn nao_remove_o_unico_local() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    let only = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("unico")))
        .await
        .unwrap();

    let err = ctx
        .location_service
        .delete_location(only.id)
        .await
        .expect_err("remover o único local deveria falhar");
    assert!(matches!(err, AppError::CannotDeleteOnlyLocation));

    // A contagem não mudou
    let locations = ctx
        .location_service
        .list_locations(restaurant.id, None)
        .await
        .unwrap();
    assert_eq!(locations.len(), 1);
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn remover_o_primario_promove_o_irmao() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    // A nasce primário, B não
    let a = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("a")))
        .await
        .unwrap();
    let b = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("b")))
        .await
        .unwrap();
    assert!(a.is_primary);
    assert!(!b.is_primary);

    let deleted = ctx.location_service.delete_location(a.id).await.unwrap();
    assert!(deleted);

    let primary = ctx
        .location_service
        .get_primary(restaurant.id)
        .await
        .unwrap()
        .expect("restaurante ficou sem primário após a remoção");
    assert_eq!(primary.id, b.id);
    assert!(primary.is_primary);
    assert_eq!(count_primaries(&ctx, restaurant.id).await, 1);
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn rebaixar_o_primario_via_update_promove_outro() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    let a = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("a")))
        .await
        .unwrap();
    let b = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("b")))
        .await
        .unwrap();

    let payload = UpdateLocationPayload { is_primary: Some(false), ..Default::default() };
    let updated = ctx.location_service.update_location(a.id, payload).await.unwrap();
    assert!(!updated.is_primary);

    // B herdou a flag na mesma transação
    let primary = ctx
        .location_service
        .get_primary(restaurant.id)
        .await
        .unwrap()
        .expect("restaurante ficou sem primário após o rebaixamento");
    assert_eq!(primary.id, b.id);
    assert_eq!(count_primaries(&ctx, restaurant.id).await, 1);
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn rebaixar_sem_substituto_falha() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    let only = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("unico")))
        .await
        .unwrap();

    let payload = UpdateLocationPayload { is_primary: Some(false), ..Default::default() };
    let err = ctx
        .location_service
        .update_location(only.id, payload)
        .await
        .expect_err("rebaixar o único local deveria falhar");
    assert!(matches!(err, AppError::CannotDemoteOnlyPrimary));

    // O rollback preservou a flag
    assert_eq!(count_primaries(&ctx, restaurant.id).await, 1);
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn set_primary_eh_idempotente() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    let a = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("a")))
        .await
        .unwrap();
    ctx.location_service
        .create_location(restaurant.id, location_payload(&unique_slug("b")))
        .await
        .unwrap();

    for _ in 0..3 {
        let result = ctx.location_service.set_primary(a.id).await.unwrap();
        assert!(result.is_primary);
        assert_eq!(count_primaries(&ctx, restaurant.id).await, 1);
    }
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn set_primary_concorrente_deixa_exatamente_um() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    let a = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("a")))
        .await
        .unwrap();
    let b = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("b")))
        .await
        .unwrap();

    // Duas tasks disputando o primário do MESMO restaurante, várias rodadas.
    // Os locks de linha do Postgres serializam a dupla limpar/marcar; nunca
    // pode sobrar zero nem dois primários.
    for _ in 0..10 {
        let svc_a = ctx.location_service.clone();
        let svc_b = ctx.location_service.clone();
        let (id_a, id_b) = (a.id, b.id);

        let task_a = tokio::spawn(async move { svc_a.set_primary(id_a).await });
        let task_b = tokio::spawn(async move { svc_b.set_primary(id_b).await });

        task_a.await.unwrap().expect("set_primary(A) falhou");
        task_b.await.unwrap().expect("set_primary(B) falhou");

        assert_eq!(
            count_primaries(&ctx, restaurant.id).await,
            1,
            "a disputa deixou o restaurante com um número errado de primários"
        );
    }
}

#[tokio::test]
#[ignore = "Requer um Postgres em execução (DATABASE_URL)"]
async fn listagem_ordena_primario_primeiro() {
    let ctx = TestContext::new().await;
    let restaurant = ctx.create_restaurant().await;

    ctx.location_service
        .create_location(restaurant.id, location_payload(&unique_slug("a")))
        .await
        .unwrap();
    ctx.location_service
        .create_location(restaurant.id, location_payload(&unique_slug("b")))
        .await
        .unwrap();
    let c = ctx
        .location_service
        .create_location(restaurant.id, location_payload(&unique_slug("c")))
        .await
        .unwrap();

    ctx.location_service.set_primary(c.id).await.unwrap();

    let listed = ctx
        .location_service
        .list_locations(restaurant.id, None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].id, c.id, "o primário deve vir primeiro");

    let stats = ctx.location_service.location_stats(restaurant.id).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 3);
    assert_eq!(stats.inactive, 0);
}
