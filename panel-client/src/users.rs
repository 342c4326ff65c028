use std::sync::Arc;

use panel_core::{ApiResult, Mutated, User, UserUpdateInput, parse_entity_body};

use crate::http::HttpClient;

#[derive(Debug, Clone)]
/// Профиль текущего пользователя: `/api/user`.
pub struct UserService {
    http: Arc<HttpClient>,
}

impl UserService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Данные текущего пользователя.
    pub async fn current_user(&self) -> ApiResult<User> {
        let body = self.http.get_plain("/api/user").await?;
        parse_entity_body(&body).map(|(user, _)| user)
    }

    /// Обновляет профиль; поля `None` не отправляются вовсе.
    pub async fn update_user(&self, id: i64, input: &UserUpdateInput) -> ApiResult<Mutated<User>> {
        let body = self.http.put_json(&format!("/api/user/{id}"), input).await?;
        parse_entity_body(&body).map(|(user, message)| Mutated::new(user, message))
    }
}
