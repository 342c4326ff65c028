use std::sync::Arc;

use async_trait::async_trait;
use panel_core::{
    ApiResult, Category, CategoryInput, ListFilter, ListSource, Mutated, Page, parse_ack_body,
    parse_entity_body, parse_page_body,
};

use crate::http::HttpClient;

const BASE_PATH: &str = "/api/categories";

#[derive(Debug, Clone)]
/// Категории товаров: `/api/categories`.
pub struct CategoryService {
    http: Arc<HttpClient>,
}

impl CategoryService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Страница категорий по фильтру.
    pub async fn list(&self, filter: &ListFilter) -> ApiResult<Page<Category>> {
        let body = self.http.get(BASE_PATH, filter).await?;
        parse_page_body(&body)
    }

    /// Категория по идентификатору.
    pub async fn get(&self, id: i64) -> ApiResult<Category> {
        let body = self.http.get_plain(&format!("{BASE_PATH}/{id}")).await?;
        parse_entity_body(&body).map(|(category, _)| category)
    }

    /// Создаёт категорию.
    pub async fn create(&self, input: &CategoryInput) -> ApiResult<Mutated<Category>> {
        let body = self.http.post_json(BASE_PATH, input).await?;
        parse_entity_body(&body).map(|(category, message)| Mutated::new(category, message))
    }

    /// Обновляет категорию.
    pub async fn update(&self, id: i64, input: &CategoryInput) -> ApiResult<Mutated<Category>> {
        let body = self
            .http
            .put_json(&format!("{BASE_PATH}/{id}"), input)
            .await?;
        parse_entity_body(&body).map(|(category, message)| Mutated::new(category, message))
    }

    /// Удаляет категорию.
    pub async fn delete(&self, id: i64) -> ApiResult<Mutated<()>> {
        let body = self.http.delete(&format!("{BASE_PATH}/{id}")).await?;
        parse_ack_body(&body).map(|message| Mutated::new((), message))
    }
}

#[async_trait]
impl ListSource<Category> for CategoryService {
    async fn fetch_page(&self, filter: &ListFilter) -> ApiResult<Page<Category>> {
        self.list(filter).await
    }
}
