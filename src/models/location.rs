// src/models/location.rs

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ---
// 1. Status do Local
// ---
// Guardado como TEXT no banco ('active' / 'inactive').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Active,
    Inactive,
}

// ---
// 2. Horário de Funcionamento
// ---
// JSONB com o conjunto FIXO de chaves: os 7 dias da semana + 'holidays'.
// Cada dia tem {open, close, closed}; quando closed = true, open/close
// podem ficar nulos.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DaySchedule {
    #[schema(example = "09:00")]
    pub open: Option<String>,
    #[schema(example = "22:00")]
    pub close: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperatingHours {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
    pub holidays: DaySchedule,
}

impl OperatingHours {
    fn days(&self) -> [(&'static str, &DaySchedule); 8] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
            ("holidays", &self.holidays),
        ]
    }
}

// Valida um horário no formato "HH:MM" (ex.: "09:00", "23:30").
fn parse_hhmm(value: &str) -> bool {
    NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

// Validador custom usado pelos payloads: cada dia aberto precisa de
// open e close válidos no padrão HH:MM.
pub fn validate_operating_hours(hours: &OperatingHours) -> Result<(), ValidationError> {
    for (day, schedule) in hours.days() {
        if schedule.closed {
            continue;
        }
        match (&schedule.open, &schedule.close) {
            (Some(open), Some(close)) if parse_hhmm(open) && parse_hhmm(close) => {}
            _ => {
                let mut err = ValidationError::new("operating_hours");
                err.message = Some(
                    format!("O dia '{}' precisa de horários de abertura e fechamento no formato HH:MM.", day).into(),
                );
                return Err(err);
            }
        }
    }
    Ok(())
}

// Slug URL-safe: minúsculas, dígitos e hífens (sem hífen nas pontas).
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some("O slug deve conter apenas letras minúsculas, dígitos e hífens.".into());
        Err(err)
    }
}

// ---
// 3. Location (O que sai do banco)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    pub restaurant_id: Uuid,

    #[schema(example = "Unidade Centro")]
    pub name: String,

    #[schema(example = "unidade-centro")]
    pub slug: String,

    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_postal_code: String,
    pub address_country: String,

    #[schema(value_type = OperatingHours)]
    pub operating_hours: Json<OperatingHours>,

    #[schema(example = json!(["delivery", "outdoor-seating"]))]
    pub features: Vec<String>,

    pub status: LocationStatus,

    // Exatamente um local primário por restaurante. A eleição é feita
    // pelo serviço, dentro de transação.
    pub is_primary: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 4. Payloads (Os "Formulários" da API)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationPayload {
    #[validate(length(min = 1, max = 120, message = "O nome do local é obrigatório."))]
    #[schema(example = "Unidade Centro")]
    pub name: String,

    #[validate(length(min = 1, max = 80, message = "O slug é obrigatório."), custom(function = validate_slug))]
    #[schema(example = "unidade-centro")]
    pub slug: String,

    #[validate(length(min = 1, message = "A rua é obrigatória."))]
    pub address_street: String,
    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub address_city: String,
    #[validate(length(min = 1, message = "O estado é obrigatório."))]
    pub address_state: String,
    #[validate(length(min = 1, message = "O CEP é obrigatório."))]
    pub address_postal_code: String,
    #[validate(length(min = 1, message = "O país é obrigatório."))]
    pub address_country: String,

    #[validate(custom(function = validate_operating_hours))]
    pub operating_hours: OperatingHours,

    #[serde(default)]
    pub features: Vec<String>,

    // Primeiro local do restaurante vira primário mesmo se enviado false.
    #[serde(default)]
    pub is_primary: bool,

    pub status: Option<LocationStatus>,
}

// Atualização parcial: todo campo é opcional; o que vier None fica como está.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationPayload {
    #[validate(length(min = 1, max = 120, message = "O nome do local não pode ser vazio."))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 80, message = "O slug não pode ser vazio."), custom(function = validate_slug))]
    pub slug: Option<String>,

    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_country: Option<String>,

    #[validate(custom(function = validate_operating_hours))]
    pub operating_hours: Option<OperatingHours>,

    pub features: Option<Vec<String>>,
    pub status: Option<LocationStatus>,
    pub is_primary: Option<bool>,
}

// ---
// 5. Estatísticas (contagens por status)
// ---
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn horario_padrao() -> OperatingHours {
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

    #[test]
    fn slug_valido_passa() {
        assert!(validate_slug("unidade-centro").is_ok());
        assert!(validate_slug("loja2").is_ok());
    }

    #[test]
    fn slug_invalido_falha() {
        assert!(validate_slug("Unidade-Centro").is_err()); // maiúsculas
        assert!(validate_slug("unidade centro").is_err()); // espaço
        assert!(validate_slug("-centro").is_err()); // hífen na ponta
        assert!(validate_slug("centro-").is_err());
        assert!(validate_slug("uni--dade").is_err()); // hífen duplo
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn horario_completo_passa() {
        assert!(validate_operating_hours(&horario_padrao()).is_ok());
    }

    #[test]
    fn dia_aberto_sem_horario_falha() {
        let mut hours = horario_padrao();
        hours.monday = DaySchedule { open: None, close: None, closed: false };
        assert!(validate_operating_hours(&hours).is_err());
    }

    #[test]
    fn horario_fora_do_padrao_hhmm_falha() {
        let mut hours = horario_padrao();
        hours.friday = dia_aberto("9h00", "22:00");
        assert!(validate_operating_hours(&hours).is_err());

        hours.friday = dia_aberto("25:00", "26:00");
        assert!(validate_operating_hours(&hours).is_err());
    }

    #[test]
    fn dia_fechado_dispensa_horarios() {
        let mut hours = horario_padrao();
        hours.monday = dia_fechado();
        assert!(validate_operating_hours(&hours).is_ok());
    }

    #[test]
    fn horario_serializa_com_as_oito_chaves() {
        let json = serde_json::to_value(horario_padrao()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "holidays"] {
            assert!(obj.contains_key(key), "faltou a chave '{}'", key);
        }
    }
}
