use std::sync::Arc;

use async_trait::async_trait;
use panel_core::{
    ApiResult, ListFilter, ListSource, Mutated, Page, Transaction, TransactionInput,
    parse_ack_body, parse_entity_body, parse_page_body,
};

use crate::http::HttpClient;

const BASE_PATH: &str = "/api/transactions";

#[derive(Debug, Clone)]
/// Складские транзакции: `/api/transactions`.
///
/// У транзакций нет обновления: проведённый документ меняет остатки,
/// поэтому API даёт только создание, листинг и удаление.
pub struct TransactionService {
    http: Arc<HttpClient>,
}

impl TransactionService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Страница транзакций по фильтру.
    pub async fn list(&self, filter: &ListFilter) -> ApiResult<Page<Transaction>> {
        let body = self.http.get(BASE_PATH, filter).await?;
        parse_page_body(&body)
    }

    /// Проводит транзакцию; сервер возвращает созданные документы.
    pub async fn create(&self, input: &TransactionInput) -> ApiResult<Mutated<Vec<Transaction>>> {
        let body = self.http.post_json(BASE_PATH, input).await?;
        parse_entity_body(&body)
            .map(|(transactions, message)| Mutated::new(transactions, message))
    }

    /// Удаляет транзакцию.
    pub async fn delete(&self, id: i64) -> ApiResult<Mutated<()>> {
        let body = self.http.delete(&format!("{BASE_PATH}/{id}")).await?;
        parse_ack_body(&body).map(|message| Mutated::new((), message))
    }
}

#[async_trait]
impl ListSource<Transaction> for TransactionService {
    async fn fetch_page(&self, filter: &ListFilter) -> ApiResult<Page<Transaction>> {
        self.list(filter).await
    }
}
