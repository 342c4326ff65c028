use std::sync::Arc;

use async_trait::async_trait;
use panel_core::{
    ApiResult, ListFilter, ListSource, Mutated, Page, Product, ProductInput, parse_ack_body,
    parse_entity_body, parse_page_body,
};

use crate::http::HttpClient;

const BASE_PATH: &str = "/api/products";

#[derive(Debug, Clone)]
/// Товары: `/api/products`.
///
/// Изображение передаётся строкой (`gambar_produk`); загрузка файлов
/// как multipart осталась за бэкендом и сюда не переносилась.
pub struct ProductService {
    http: Arc<HttpClient>,
}

impl ProductService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Страница товаров по фильтру.
    pub async fn list(&self, filter: &ListFilter) -> ApiResult<Page<Product>> {
        let body = self.http.get(BASE_PATH, filter).await?;
        parse_page_body(&body)
    }

    /// Товар по идентификатору.
    pub async fn get(&self, id: i64) -> ApiResult<Product> {
        let body = self.http.get_plain(&format!("{BASE_PATH}/{id}")).await?;
        parse_entity_body(&body).map(|(product, _)| product)
    }

    /// Создаёт товар.
    pub async fn create(&self, input: &ProductInput) -> ApiResult<Mutated<Product>> {
        let body = self.http.post_json(BASE_PATH, input).await?;
        parse_entity_body(&body).map(|(product, message)| Mutated::new(product, message))
    }

    /// Обновляет товар.
    pub async fn update(&self, id: i64, input: &ProductInput) -> ApiResult<Mutated<Product>> {
        let body = self
            .http
            .put_json(&format!("{BASE_PATH}/{id}"), input)
            .await?;
        parse_entity_body(&body).map(|(product, message)| Mutated::new(product, message))
    }

    /// Удаляет товар.
    pub async fn delete(&self, id: i64) -> ApiResult<Mutated<()>> {
        let body = self.http.delete(&format!("{BASE_PATH}/{id}")).await?;
        parse_ack_body(&body).map(|message| Mutated::new((), message))
    }
}

#[async_trait]
impl ListSource<Product> for ProductService {
    async fn fetch_page(&self, filter: &ListFilter) -> ApiResult<Page<Product>> {
        self.list(filter).await
    }
}
