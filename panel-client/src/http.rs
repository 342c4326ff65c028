use std::sync::Arc;
use std::time::Duration;

use panel_core::{ApiError, ApiResult, SessionStore};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
/// Транспорт поверх `reqwest`: базовый URL, таймауты, bearer-токен.
pub struct HttpClient {
    base_url: String,
    client: Client,
    session: Arc<SessionStore>,
}

impl HttpClient {
    /// Создаёт транспорт с таймаутами по умолчанию.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.endpoint(path));
        // токен подставляется в момент запроса: после logout или 401
        // следующий запрос уходит уже без заголовка
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Отправляет запрос и возвращает тело успешного ответа.
    ///
    /// Любой 401 дополнительно сбрасывает сессию — то же поведение, что
    /// у явного выхода, плюс колбэк редиректа.
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<String> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::debug!(target: "panel::http", status = status.as_u16(), "запрос отклонён");
        if status.as_u16() == 401 {
            self.session.handle_unauthorized();
        }
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    pub(crate) async fn get<Q>(&self, path: &str, query: &Q) -> ApiResult<String>
    where
        Q: Serialize + ?Sized,
    {
        self.execute(self.request(Method::GET, path).query(query))
            .await
    }

    pub(crate) async fn get_plain(&self, path: &str) -> ApiResult<String> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub(crate) async fn post_json<B>(&self, path: &str, body: &B) -> ApiResult<String>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, path).json(body))
            .await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> ApiResult<String> {
        self.execute(self.request(Method::POST, path)).await
    }

    pub(crate) async fn put_json<B>(&self, path: &str, body: &B) -> ApiResult<String>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path).json(body))
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<String> {
        self.execute(self.request(Method::DELETE, path)).await
    }
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}
