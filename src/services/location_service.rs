// src/services/location_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LocationRepository, RestaurantRepository},
    models::location::{
        CreateLocationPayload, Location, LocationStats, LocationStatus, UpdateLocationPayload,
    },
};

// O serviço que sustenta a invariante central do domínio:
// todo restaurante com pelo menos um local tem EXATAMENTE UM primário.
// Toda mutação que toca a flag roda em transação (limpar -> marcar),
// e nenhum estado intermediário é visível para outros chamadores.
#[derive(Clone)]
pub struct LocationService {
    location_repo: LocationRepository,
    restaurant_repo: RestaurantRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl LocationService {
    pub fn new(
        location_repo: LocationRepository,
        restaurant_repo: RestaurantRepository,
        pool: PgPool,
    ) -> Self {
        Self { location_repo, restaurant_repo, pool }
    }

    /// Cria um local para o restaurante. O primeiro local do restaurante
    /// nasce primário mesmo que o payload diga o contrário — sem isso a
    /// invariante já nasceria violada.
    pub async fn create_location(
        &self,
        restaurant_id: Uuid,
        data: CreateLocationPayload,
    ) -> Result<Location, AppError> {
        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Tranca o restaurante: serializa criações concorrentes e já
        //    confere a existência de uma vez
        if !self.restaurant_repo.lock_for_update(&mut *tx, restaurant_id).await? {
            return Err(AppError::RestaurantNotFound);
        }

        // 3. Slug único dentro do restaurante (case-insensitive)
        if self.location_repo
            .slug_in_use(&mut *tx, restaurant_id, &data.slug, None)
            .await?
        {
            return Err(AppError::SlugAlreadyExists(data.slug));
        }

        // 4. Primeiro local vira primário; pedido explícito também vale
        let siblings = self.location_repo.count_by_restaurant(&mut *tx, restaurant_id).await?;
        let is_primary = data.is_primary || siblings == 0;

        // 5. Se vai nascer primário, limpa a flag dos irmãos ANTES do insert
        if is_primary && siblings > 0 {
            self.location_repo
                .clear_primary_flags(&mut *tx, restaurant_id, None)
                .await?;
        }

        let status = data.status.unwrap_or(LocationStatus::Active);
        let location = self.location_repo
            .insert(&mut *tx, restaurant_id, &data, is_primary, status)
            .await?;

        // 6. Commit
        tx.commit().await?;

        tracing::info!("🏪 Local '{}' criado para o restaurante {}", location.slug, restaurant_id);
        Ok(location)
    }

    /// Atualização parcial. Dois caminhos delicados:
    /// - is_primary = true: limpa os irmãos na mesma transação.
    /// - is_primary = false no primário atual: promove um substituto na
    ///   mesma transação, ou falha se não houver outro local.
    pub async fn update_location(
        &self,
        id: Uuid,
        data: UpdateLocationPayload,
    ) -> Result<Location, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Descobre o restaurante do alvo e tranca-o: serializa com as
        //    demais mutações de primário deste restaurante
        let found = self.location_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        if !self.restaurant_repo.lock_for_update(&mut *tx, found.restaurant_id).await? {
            return Err(AppError::RestaurantNotFound);
        }

        // Relê o alvo JÁ sob o lock: as flags podem ter mudado enquanto
        // esperávamos a vez
        let current = self.location_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        // 2. Se o slug muda, re-checa unicidade excluindo a própria linha
        if let Some(slug) = &data.slug {
            if !slug.eq_ignore_ascii_case(&current.slug)
                && self.location_repo
                    .slug_in_use(&mut *tx, current.restaurant_id, slug, Some(id))
                    .await?
            {
                return Err(AppError::SlugAlreadyExists(slug.clone()));
            }
        }

        let promoting = data.is_primary == Some(true) && !current.is_primary;
        let demoting = data.is_primary == Some(false) && current.is_primary;

        // 3. Promoção: limpa os irmãos antes de aplicar o update
        if promoting {
            self.location_repo
                .clear_primary_flags(&mut *tx, current.restaurant_id, Some(id))
                .await?;
        }

        // 4. Aplica o update parcial
        let updated = self.location_repo
            .update(&mut *tx, id, &data, data.is_primary)
            .await?
            // A linha sumiu entre a leitura e a escrita: corrida rara,
            // devolvida ao chamador em vez de ignorada em silêncio.
            .ok_or(AppError::LocationNotFound)?;

        // 5. Rebaixamento: alguém precisa herdar a flag, na MESMA transação.
        //    (A ordem importa: o índice parcial não admite dois primários.)
        if demoting {
            let candidate = self.location_repo
                .election_candidate(&mut *tx, current.restaurant_id, id)
                .await?
                .ok_or(AppError::CannotDemoteOnlyPrimary)?;

            let marked = self.location_repo.mark_primary(&mut *tx, candidate.id).await?;
            if marked == 0 {
                // O candidato sumiu no meio do caminho: aborta tudo.
                return Err(AppError::LocationNotFound);
            }
            tracing::info!("📍 Local {} promovido a primário no lugar de {}", candidate.id, id);
        }

        // 6. Commit
        tx.commit().await?;

        Ok(updated)
    }

    /// A operação canônica da invariante: limpar todos -> marcar um,
    /// como unidade atômica. Re-executar com o mesmo alvo é no-op.
    pub async fn set_primary(&self, id: Uuid) -> Result<Location, AppError> {
        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Descobre o restaurante do alvo
        let location = self.location_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        // Serializa as disputas pelo primário deste restaurante: sem este
        // lock, duas trocas simultâneas podem ambas "limpar" antes de
        // qualquer uma marcar, e o read-committed deixaria passar dois
        // primários (ou zero).
        if !self.restaurant_repo.lock_for_update(&mut *tx, location.restaurant_id).await? {
            return Err(AppError::RestaurantNotFound);
        }

        // 3. Fase de limpeza: todos os irmãos perdem a flag
        self.location_repo
            .clear_primary_flags(&mut *tx, location.restaurant_id, Some(id))
            .await?;

        // 4. Fase de marcação: o alvo ganha a flag
        let marked = self.location_repo.mark_primary(&mut *tx, id).await?;
        if marked == 0 {
            // Sumiu entre as fases: rollback implícito preserva o estado anterior.
            return Err(AppError::LocationNotFound);
        }

        // 5. Relê dentro da transação para devolver o registro consistente
        let updated = self.location_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        // 6. Commit
        tx.commit().await?;

        Ok(updated)
    }

    /// Remove um local. O último local de um restaurante nunca pode ser
    /// removido; remover o primário promove um substituto primeiro, tudo
    /// na mesma transação.
    pub async fn delete_location(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Carrega o alvo, tranca o restaurante e relê sob o lock
        let found = self.location_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        if !self.restaurant_repo.lock_for_update(&mut *tx, found.restaurant_id).await? {
            return Err(AppError::RestaurantNotFound);
        }

        let location = self.location_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        let siblings = self.location_repo
            .count_by_restaurant(&mut *tx, location.restaurant_id)
            .await?;
        if siblings <= 1 {
            return Err(AppError::CannotDeleteOnlyLocation);
        }

        // 2. Se é o primário, elege o herdeiro ANTES de remover
        if location.is_primary {
            let candidate = self.location_repo
                .election_candidate(&mut *tx, location.restaurant_id, id)
                .await?
                // siblings >= 2 garante candidato; se sumiu, aborta
                .ok_or(AppError::LocationNotFound)?;

            self.location_repo
                .clear_primary_flags(&mut *tx, location.restaurant_id, Some(candidate.id))
                .await?;
            let marked = self.location_repo.mark_primary(&mut *tx, candidate.id).await?;
            if marked == 0 {
                return Err(AppError::LocationNotFound);
            }
            tracing::info!(
                "📍 Local {} herdou o primário do restaurante {}",
                candidate.id,
                location.restaurant_id
            );
        }

        // 3. Remove a linha
        let deleted = self.location_repo.delete(&mut *tx, id).await?;
        if deleted == 0 {
            return Err(AppError::LocationNotFound);
        }

        // 4. Commit
        tx.commit().await?;

        tracing::info!("🗑️ Local {} removido do restaurante {}", id, location.restaurant_id);
        Ok(true)
    }

    pub async fn get_location(&self, id: Uuid) -> Result<Location, AppError> {
        self.location_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::LocationNotFound)
    }

    pub async fn get_primary(&self, restaurant_id: Uuid) -> Result<Option<Location>, AppError> {
        // Leitura pura, sem transação.
        self.location_repo.find_primary(restaurant_id).await
    }

    pub async fn list_locations(
        &self,
        restaurant_id: Uuid,
        status: Option<LocationStatus>,
    ) -> Result<Vec<Location>, AppError> {
        self.location_repo.find_all_by_restaurant(restaurant_id, status).await
    }

    pub async fn location_stats(&self, restaurant_id: Uuid) -> Result<LocationStats, AppError> {
        self.location_repo.stats(restaurant_id).await
    }
}
