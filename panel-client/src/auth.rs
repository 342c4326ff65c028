use std::sync::Arc;

use panel_core::{
    ApiResult, AuthPayload, LoginInput, RegisterInput, parse_ack_body, parse_auth_body,
};

use crate::http::HttpClient;

#[derive(Debug, Clone)]
/// Аутентификация: `/api/auth/*`.
///
/// Сервис только ходит по сети; запись токена в сессию и её очистка —
/// забота `SessionStore` на стороне вызывающего.
pub struct AuthService {
    http: Arc<HttpClient>,
}

impl AuthService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Вход по email и паролю.
    ///
    /// Вернувшийся токен вызывающий кладёт в сессию сам.
    pub async fn login(&self, input: &LoginInput) -> ApiResult<AuthPayload> {
        let body = self.http.post_json("/api/auth/login", input).await?;
        parse_auth_body(&body)
    }

    /// Регистрация нового пользователя; сервер сразу возвращает токен.
    pub async fn register(&self, input: &RegisterInput) -> ApiResult<AuthPayload> {
        let body = self.http.post_json("/api/auth/register", input).await?;
        parse_auth_body(&body)
    }

    /// Выход на сервере; локальную сессию чистит `SessionStore`.
    pub async fn logout(&self) -> ApiResult<String> {
        let body = self.http.post_empty("/api/auth/logout").await?;
        parse_ack_body(&body)
    }
}
