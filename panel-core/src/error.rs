use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::envelope::ValidationErrorBody;

#[derive(Debug, Clone, Error)]
/// Ошибки клиентского слоя, единые для всех транспортов.
pub enum ApiError {
    /// Сеть недоступна или запрос оборвался (таймаут, DNS, CORS).
    #[error("network error: {0}")]
    Network(String),

    /// Сервер ответил 401/403: токен отсутствует, протух или прав не хватает.
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Серверная валидация отклонила данные (422).
    #[error("validation failed: {message}")]
    Validation {
        /// Первая ошибка поля — то, что показывается пользователю.
        message: String,
        /// Полная карта ошибок по полям для отображения в форме.
        fields: BTreeMap<String, Vec<String>>,
    },

    /// Бизнес-ошибка или любой другой неуспешный ответ сервера.
    #[error("api error: {0}")]
    Api(String),

    /// Не удалось разобрать тело ответа.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Результат операций клиентского слоя.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn extract_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
}

impl ApiError {
    /// Человекочитаемое сообщение для показа пользователю.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Не удалось связаться с сервером. Проверьте подключение.".to_string()
            }
            Self::Unauthorized => "Требуется авторизация".to_string(),
            Self::NotFound => "Ресурс не найден".to_string(),
            Self::Validation { message, .. } => message.clone(),
            Self::Api(message) => message.clone(),
            Self::Decode(_) => "Сервер вернул некорректный ответ".to_string(),
        }
    }

    /// Классифицирует неуспешный HTTP-статус по телу ответа.
    ///
    /// Общая точка для обоих транспортов (`reqwest` и `gloo-net`), чтобы
    /// таксономия ошибок не расходилась между CLI и браузером.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            422 => Self::from_validation_body(body),
            _ => Self::Api(
                extract_message(body).unwrap_or_else(|| format!("http status {status}")),
            ),
        }
    }

    fn from_validation_body(body: &str) -> Self {
        let parsed = match serde_json::from_str::<ValidationErrorBody>(body) {
            Ok(parsed) => parsed,
            Err(_) => {
                return Self::Validation {
                    message: extract_message(body)
                        .unwrap_or_else(|| "Проверьте введённые данные".to_string()),
                    fields: BTreeMap::new(),
                };
            }
        };

        let first_field_error = parsed
            .errors
            .values()
            .flat_map(|messages| messages.iter())
            .next()
            .cloned();

        let message = first_field_error
            .or(parsed.message)
            .unwrap_or_else(|| "Проверьте введённые данные".to_string());

        Self::Validation {
            message,
            fields: parsed.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_maps_auth_codes() {
        assert!(matches!(
            ApiError::from_status(401, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(403, ""),
            ApiError::Unauthorized
        ));
    }

    #[test]
    fn from_status_maps_not_found() {
        assert!(matches!(ApiError::from_status(404, ""), ApiError::NotFound));
    }

    #[test]
    fn from_status_passes_server_message_through() {
        let err = ApiError::from_status(409, r#"{"message":"Stok tidak cukup"}"#);
        match err {
            ApiError::Api(message) => assert_eq!(message, "Stok tidak cukup"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn from_status_falls_back_to_status_code() {
        let err = ApiError::from_status(500, "not json");
        match err {
            ApiError::Api(message) => assert_eq!(message, "http status 500"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn validation_body_surfaces_first_field_error() {
        let body = r#"{
            "message": "The given data was invalid.",
            "errors": {
                "nama_kategori": ["Nama kategori wajib diisi.", "Minimal 2 karakter."],
                "stok_produk": ["Stok tidak boleh negatif."]
            }
        }"#;
        let err = ApiError::from_status(422, body);
        match err {
            ApiError::Validation { message, fields } => {
                assert_eq!(message, "Nama kategori wajib diisi.");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields["stok_produk"], vec!["Stok tidak boleh negatif."]);
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn validation_without_errors_map_keeps_message() {
        let err = ApiError::from_status(422, r#"{"message":"Invalid payload"}"#);
        match err {
            ApiError::Validation { message, fields } => {
                assert_eq!(message, "Invalid payload");
                assert!(fields.is_empty());
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn user_message_hides_technical_details() {
        let err = ApiError::Network("connection refused".to_string());
        assert!(err.user_message().starts_with("Не удалось связаться"));

        let err = ApiError::Decode("expected value at line 1".to_string());
        assert_eq!(err.user_message(), "Сервер вернул некорректный ответ");
    }
}
