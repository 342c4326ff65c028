use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::filter::DEFAULT_PER_PAGE;
use crate::models::{AuthPayload, User};

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
/// Единый конверт одиночных ответов API: `{status, message, data}`.
pub struct ApiEnvelope<T> {
    /// Флаг успеха на уровне приложения.
    pub status: bool,
    /// Сообщение сервера; идёт в уведомления.
    #[serde(default)]
    pub message: Option<String>,
    /// Полезная нагрузка; отсутствует при ошибке и у удаления.
    #[serde(default)]
    pub data: Option<T>,
    /// Детали ошибки, если сервер их прислал.
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Разворачивает конверт: `data` и сообщение при `status == true`,
    /// иначе ошибка с серверным текстом.
    pub fn into_result(self) -> ApiResult<(T, String)> {
        if !self.status {
            return Err(ApiError::Api(self.failure_message()));
        }
        let message = self.message.unwrap_or_default();
        match self.data {
            Some(data) => Ok((data, message)),
            None => Err(ApiError::Decode("envelope without data".to_string())),
        }
    }

    /// Разворачивает конверт мутации без полезной нагрузки (удаление).
    pub fn into_message(self) -> ApiResult<String> {
        if !self.status {
            return Err(ApiError::Api(self.failure_message()));
        }
        Ok(self.message.unwrap_or_default())
    }

    fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "запрос отклонён сервером".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Страница листинга в формате Laravel-пагинатора.
pub struct PageDto<T> {
    /// Номер текущей страницы.
    pub current_page: u32,
    /// Сущности текущей страницы.
    pub data: Vec<T>,
    /// Номер последней страницы.
    pub last_page: u32,
    /// Размер страницы.
    pub per_page: u32,
    /// Всего сущностей в выборке.
    pub total: i64,
    /// Порядковый номер первой сущности страницы; `null` у пустой.
    #[serde(default)]
    pub from: Option<u64>,
    /// Порядковый номер последней сущности страницы; `null` у пустой.
    #[serde(default)]
    pub to: Option<u64>,
    /// URL следующей страницы, если она есть.
    #[serde(default)]
    pub next_page_url: Option<String>,
    /// URL предыдущей страницы, если она есть.
    #[serde(default)]
    pub prev_page_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Метаданные страницы после нормализации.
pub struct PageMeta {
    /// Номер текущей страницы, в пределах `[1, last_page]`.
    pub current_page: u32,
    /// Размер страницы.
    pub per_page: u32,
    /// Всего сущностей в выборке.
    pub total: u64,
    /// Номер последней страницы, не меньше 1.
    pub last_page: u32,
    /// Номер первой сущности страницы.
    pub from: Option<u64>,
    /// Номер последней сущности страницы.
    pub to: Option<u64>,
    /// URL следующей страницы.
    pub next_page_url: Option<String>,
    /// URL предыдущей страницы.
    pub prev_page_url: Option<String>,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            per_page: DEFAULT_PER_PAGE,
            total: 0,
            last_page: 1,
            from: None,
            to: None,
            next_page_url: None,
            prev_page_url: None,
        }
    }
}

#[derive(Debug, Clone)]
/// Страница сущностей с метаданными пагинации.
pub struct Page<T> {
    /// Сущности текущей страницы.
    pub items: Vec<T>,
    /// Метаданные пагинации.
    pub meta: PageMeta,
}

impl<T> From<PageDto<T>> for Page<T> {
    fn from(dto: PageDto<T>) -> Self {
        let last_page = dto.last_page.max(1);
        Self {
            items: dto.data,
            meta: PageMeta {
                current_page: dto.current_page.clamp(1, last_page),
                per_page: dto.per_page.max(1),
                total: dto.total.max(0) as u64,
                last_page,
                from: dto.from,
                to: dto.to,
                next_page_url: dto.next_page_url,
                prev_page_url: dto.prev_page_url,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Ответ логина/регистрации: `{status, access_token, user}`.
pub struct AuthEnvelope {
    /// Флаг успеха.
    pub status: bool,
    /// Сообщение сервера (причина отказа при неуспехе).
    #[serde(default)]
    pub message: Option<String>,
    /// Bearer-токен.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Пользователь.
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthEnvelope {
    /// Разворачивает конверт аутентификации.
    pub fn into_result(self) -> ApiResult<AuthPayload> {
        if !self.status {
            return Err(ApiError::Api(self.message.unwrap_or_else(|| {
                "вход отклонён сервером".to_string()
            })));
        }
        match (self.access_token, self.user) {
            (Some(token), Some(user)) if !token.trim().is_empty() => Ok(AuthPayload {
                access_token: token,
                user,
            }),
            _ => Err(ApiError::Decode(
                "auth response without token or user".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Тело ответа 422 с ошибками по полям.
pub struct ValidationErrorBody {
    /// Общее сообщение сервера.
    #[serde(default)]
    pub message: Option<String>,
    /// Ошибки по полям.
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Разбирает тело списочного ответа в нормализованную страницу.
pub fn parse_page_body<T: DeserializeOwned>(body: &str) -> ApiResult<Page<T>> {
    let envelope: ApiEnvelope<PageDto<T>> = decode(body)?;
    let (dto, _) = envelope.into_result()?;
    Ok(Page::from(dto))
}

/// Разбирает тело одиночного ответа: сущность и серверное сообщение.
pub fn parse_entity_body<T: DeserializeOwned>(body: &str) -> ApiResult<(T, String)> {
    let envelope: ApiEnvelope<T> = decode(body)?;
    envelope.into_result()
}

/// Разбирает тело мутации без полезной нагрузки (удаление, выход).
pub fn parse_ack_body(body: &str) -> ApiResult<String> {
    let envelope: ApiEnvelope<serde_json::Value> = decode(body)?;
    envelope.into_message()
}

/// Разбирает тело ответа логина/регистрации.
pub fn parse_auth_body(body: &str) -> ApiResult<AuthPayload> {
    let envelope: AuthEnvelope = decode(body)?;
    envelope.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    const CATEGORY_PAGE: &str = r#"{
        "status": true,
        "message": "Data kategori berhasil diambil",
        "data": {
            "current_page": 2,
            "data": [{
                "id": 7,
                "nama_kategori": "Minuman",
                "deskripsi_kategori": "Kopi dan teh",
                "created_at": "2026-01-15T10:30:00.000000Z",
                "updated_at": "2026-01-15T10:30:00.000000Z"
            }],
            "last_page": 4,
            "per_page": 10,
            "total": 31,
            "from": 11,
            "to": 20,
            "next_page_url": "http://localhost:8000/api/categories?page=3",
            "prev_page_url": "http://localhost:8000/api/categories?page=1"
        }
    }"#;

    #[test]
    fn page_body_parses_and_normalizes() {
        let page: Page<Category> = parse_page_body(CATEGORY_PAGE).expect("parse page");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].nama_kategori, "Minuman");
        assert_eq!(page.meta.current_page, 2);
        assert_eq!(page.meta.last_page, 4);
        assert_eq!(page.meta.total, 31);
        assert!(page.meta.next_page_url.is_some());
    }

    #[test]
    fn page_normalization_clamps_out_of_range_values() {
        let dto = PageDto::<i32> {
            current_page: 9,
            data: Vec::new(),
            last_page: 0,
            per_page: 0,
            total: -5,
            from: None,
            to: None,
            next_page_url: None,
            prev_page_url: None,
        };
        let page = Page::from(dto);
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.last_page, 1);
        assert_eq!(page.meta.per_page, 1);
        assert_eq!(page.meta.total, 0);
        assert!(page.meta.from.is_none());
        assert!(page.meta.to.is_none());
    }

    #[test]
    fn entity_body_returns_data_and_message() {
        let body = r#"{
            "status": true,
            "message": "Kategori berhasil dibuat",
            "data": {
                "id": 1,
                "nama_kategori": "Snack",
                "created_at": "2026-02-01T08:00:00Z",
                "updated_at": "2026-02-01T08:00:00Z"
            }
        }"#;
        let (category, message): (Category, String) =
            parse_entity_body(body).expect("parse entity");
        assert_eq!(category.id, 1);
        assert_eq!(message, "Kategori berhasil dibuat");
    }

    #[test]
    fn rejected_envelope_becomes_api_error() {
        let body = r#"{"status": false, "message": "Kategori tidak ditemukan", "data": null}"#;
        let result: ApiResult<(Category, String)> = parse_entity_body(body);
        match result {
            Err(ApiError::Api(message)) => assert_eq!(message, "Kategori tidak ditemukan"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn ack_body_tolerates_null_data() {
        let body = r#"{"status": true, "message": "Kategori dihapus", "data": null}"#;
        let message = parse_ack_body(body).expect("parse ack");
        assert_eq!(message, "Kategori dihapus");
    }

    #[test]
    fn auth_body_success_yields_token_and_user() {
        let body = r#"{
            "status": true,
            "access_token": "abc",
            "user": {
                "id": 3,
                "nama_depan": "Budi",
                "nama_belakang": "Santoso",
                "email": "budi@example.com",
                "tanggal_lahir": "1999-04-02",
                "jenis_kelamin": "Laki-laki",
                "created_at": "2026-01-01T00:00:00Z",
                "updated_at": "2026-01-01T00:00:00Z"
            }
        }"#;
        let payload = parse_auth_body(body).expect("parse auth");
        assert_eq!(payload.access_token, "abc");
        assert_eq!(payload.user.full_name(), "Budi Santoso");
    }

    #[test]
    fn auth_body_failure_surfaces_server_message() {
        let body = r#"{"status": false, "message": "Invalid credentials"}"#;
        match parse_auth_body(body) {
            Err(ApiError::Api(message)) => assert_eq!(message, "Invalid credentials"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let result: ApiResult<Page<Category>> = parse_page_body("<html>oops</html>");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
