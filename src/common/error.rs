use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As variantes seguem a taxonomia do domínio: NotFound, Conflict,
// Validação, Operação Inválida e erros de infraestrutura.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- NotFound ---
    #[error("Restaurante não encontrado")]
    RestaurantNotFound,

    #[error("Local não encontrado")]
    LocationNotFound,

    #[error("Vínculo de equipe não encontrado")]
    AssignmentNotFound,

    #[error("Cargo não encontrado")]
    RoleNotFound,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Conflict ---
    #[error("Já existe um local com o slug '{0}' neste restaurante")]
    SlugAlreadyExists(String),

    #[error("Já existe um cargo com o nome '{0}'")]
    RoleNameAlreadyExists(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    // Violações de unicidade que o banco detectou antes de nós.
    #[error("Conflito de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // --- Operação Inválida ---
    #[error("Não é possível remover o único local do restaurante")]
    CannotDeleteOnlyLocation,

    #[error("Não é possível rebaixar o local primário sem outro local para promover")]
    CannotDemoteOnlyPrimary,

    // --- Autenticação ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::RestaurantNotFound => (StatusCode::NOT_FOUND, "Restaurante não encontrado.".to_string()),
            AppError::LocationNotFound => (StatusCode::NOT_FOUND, "Local não encontrado.".to_string()),
            AppError::AssignmentNotFound => (StatusCode::NOT_FOUND, "Vínculo de equipe não encontrado.".to_string()),
            AppError::RoleNotFound => (StatusCode::NOT_FOUND, "Cargo não encontrado.".to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string()),

            AppError::SlugAlreadyExists(ref slug) => {
                (StatusCode::CONFLICT, format!("Já existe um local com o slug '{}' neste restaurante.", slug))
            }
            AppError::RoleNameAlreadyExists(ref name) => {
                (StatusCode::CONFLICT, format!("Já existe um cargo com o nome '{}'.", name))
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string()),
            AppError::UniqueConstraintViolation(ref msg) => (StatusCode::CONFLICT, msg.clone()),

            AppError::CannotDeleteOnlyLocation => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Não é possível remover o único local do restaurante.".to_string())
            }
            AppError::CannotDemoteOnlyPrimary => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Não é possível rebaixar o local primário sem outro local para promover.".to_string())
            }

            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    // Garante que a taxonomia mapeia para os status HTTP esperados.
    #[test]
    fn not_found_vira_404() {
        let resp = AppError::LocationNotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflito_de_slug_vira_409() {
        let resp = AppError::SlugAlreadyExists("centro".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn remocao_do_unico_local_vira_422() {
        let resp = AppError::CannotDeleteOnlyLocation.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn erro_de_banco_vira_500() {
        let resp = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
