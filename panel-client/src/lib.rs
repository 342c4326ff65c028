//! HTTP-клиент админ-панели инвентаря поверх REST-бэкенда.
//!
//! Транспорт (`reqwest`) подставляет bearer-токен из общего
//! [`SessionStore`] в момент каждого запроса и приводит все сбои к
//! таксономии `panel_core::ApiError`; 401 дополнительно сбрасывает
//! сессию, как это делал бы интерцептор. Поверх транспорта — по одному
//! типизированному сервису на ресурс.
#![warn(missing_docs)]

mod auth;
mod categories;
mod http;
mod products;
mod transactions;
mod users;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use http::HttpClient;
pub use products::ProductService;
pub use transactions::TransactionService;
pub use users::UserService;

use std::sync::Arc;

use panel_core::SessionStore;

#[derive(Debug, Clone)]
/// Фасад над сервисами ресурсов с общим транспортом и сессией.
pub struct PanelClient {
    /// Аутентификация: вход, регистрация, выход.
    pub auth: AuthService,
    /// Профиль текущего пользователя.
    pub users: UserService,
    /// Категории товаров.
    pub categories: CategoryService,
    /// Товары.
    pub products: ProductService,
    /// Складские транзакции.
    pub transactions: TransactionService,
}

impl PanelClient {
    /// Создаёт клиент с базовым URL бэкенда и общей сессией.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let http = Arc::new(HttpClient::new(base_url, session));
        Self {
            auth: AuthService::new(http.clone()),
            users: UserService::new(http.clone()),
            categories: CategoryService::new(http.clone()),
            products: ProductService::new(http.clone()),
            transactions: TransactionService::new(http),
        }
    }
}
