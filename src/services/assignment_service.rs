// src/services/assignment_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AssignmentRepository,
    models::assignment::{AssignOptions, LocationAssignment},
};

// Espelho do LocationService para o lado dos usuários: todo usuário com
// pelo menos um vínculo tem EXATAMENTE UM marcado como local primário.
#[derive(Clone)]
pub struct AssignmentService {
    repo: AssignmentRepository,
    pool: PgPool,
}

impl AssignmentService {
    pub fn new(repo: AssignmentRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Concessão idempotente: o par (usuário, local) é único.
    /// - Par já existe com o mesmo cargo: devolve a linha como está.
    /// - Par já existe com cargo diferente: atualiza o role_id da linha.
    /// - Par novo: insere; o primeiro vínculo do usuário nasce primário.
    ///
    /// A legalidade do cargo (existe? está ativo?) é responsabilidade do
    /// chamador — este serviço não consulta o catálogo de cargos.
    pub async fn assign(
        &self,
        user_id: Uuid,
        location_id: Uuid,
        role_id: Uuid,
        opts: AssignOptions,
    ) -> Result<LocationAssignment, AppError> {
        // 1. Inicia a transação e tranca o usuário: serializa concessões
        //    concorrentes (duas "primeiras concessões" ao mesmo tempo não
        //    podem nascer ambas primárias)
        let mut tx = self.pool.begin().await?;
        if !self.repo.lock_user(&mut *tx, user_id).await? {
            return Err(AppError::UserNotFound);
        }

        // 2. Concessão repetida? Devolve (ou re-aponta o cargo) sem segundo insert
        if let Some(existing) = self.repo
            .find_by_user_and_location(&mut *tx, user_id, location_id)
            .await?
        {
            if existing.role_id == role_id {
                tx.commit().await?;
                return Ok(existing);
            }

            let updated = self.repo
                .update_role(&mut *tx, user_id, location_id, role_id)
                .await?
                .ok_or(AppError::AssignmentNotFound)?;
            tx.commit().await?;

            tracing::info!("🔄 Cargo do vínculo ({}, {}) atualizado", user_id, location_id);
            return Ok(updated);
        }

        // 3. Primeiro vínculo do usuário vira primário; pedido explícito também
        let existing_count = self.repo.count_for_user(&mut *tx, user_id).await?;
        let is_primary = opts.is_primary_location || existing_count == 0;

        // 4. Se vai nascer primário, limpa a flag dos outros vínculos ANTES
        if is_primary && existing_count > 0 {
            self.repo.clear_primary_flags(&mut *tx, user_id, None).await?;
        }

        let assignment = self.repo
            .insert(
                &mut *tx,
                user_id,
                location_id,
                role_id,
                is_primary,
                opts.assigned_by,
                opts.stations.as_deref(),
            )
            .await?;

        // 5. Commit
        tx.commit().await?;

        tracing::info!("🔗 Usuário {} vinculado ao local {}", user_id, location_id);
        Ok(assignment)
    }

    /// Troca o local primário do usuário: limpar todos -> marcar um, como
    /// unidade atômica. Devolve false (sem efeito algum) quando o par
    /// (usuário, local) não existe — o chamador PRECISA checar o retorno.
    pub async fn set_primary_location(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<bool, AppError> {
        // 1. Inicia a transação e tranca o usuário (serializa as trocas
        //    de primário deste usuário)
        let mut tx = self.pool.begin().await?;
        if !self.repo.lock_user(&mut *tx, user_id).await? {
            return Ok(false);
        }

        // 2. Fase de limpeza
        self.repo.clear_primary_flags(&mut *tx, user_id, Some(location_id)).await?;

        // 3. Fase de marcação
        let marked = self.repo.mark_primary(&mut *tx, user_id, location_id).await?;
        if marked == 0 {
            // Par inexistente: desfaz a limpeza para não deixar o usuário
            // sem nenhum primário.
            tx.rollback().await?;
            return Ok(false);
        }

        // 4. Commit
        tx.commit().await?;
        Ok(true)
    }

    /// Revoga o vínculo. Se a linha removida era o primário e o usuário
    /// ainda tem outros vínculos, NÃO promovemos substituto aqui: o
    /// chamador decide e chama set_primary_location explicitamente.
    // TODO: confirmar com o produto se a revogação deveria promover um
    // substituto automaticamente, como fazemos na remoção de locais.
    pub async fn remove(&self, user_id: Uuid, location_id: Uuid) -> Result<bool, AppError> {
        let deleted = self.repo.delete(&self.pool, user_id, location_id).await?;

        if deleted > 0 {
            tracing::info!("✂️ Vínculo ({}, {}) revogado", user_id, location_id);
        }
        Ok(deleted > 0)
    }

    /// Primitiva de autorização usada pelos handlers e guards.
    pub async fn user_has_location_access(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> Result<bool, AppError> {
        self.repo.user_has_location_access(user_id, location_id).await
    }

    pub async fn user_belongs_to_restaurant(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
    ) -> Result<bool, AppError> {
        self.repo.user_belongs_to_restaurant(user_id, restaurant_id).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<LocationAssignment>, AppError> {
        self.repo.find_all_for_user(user_id).await
    }
}
