//! Контрактный слой клиента админ-панели инвентаря.
//!
//! Здесь живёт всё, что не зависит от транспорта и UI-фреймворка:
//! - доменные модели и валидируемые входные данные;
//! - единый конверт ответов API и `Page<T>` для листингов;
//! - хук списка (`ListStore`) с дедупликацией и защитой от гонок ответов;
//! - хук мутаций (`MutationRunner`) с уведомлениями;
//! - сессия авторизации (`SessionStore`) с долговременным хранилищем;
//! - обобщённая табличная модель и пагинатор.
//!
//! Сам крейт не делает I/O: конкретные транспорты (`reqwest` в
//! `panel-client`, `gloo-net` в `panel-wasm`) реализуют трейты отсюда.
#![warn(missing_docs)]

mod debounce;
mod envelope;
mod error;
mod filter;
mod format;
mod list;
mod models;
mod mutation;
mod notify;
mod session;
mod table;

pub use debounce::Debouncer;
pub use envelope::{
    ApiEnvelope, AuthEnvelope, Page, PageDto, PageMeta, ValidationErrorBody, parse_ack_body,
    parse_auth_body, parse_entity_body, parse_page_body,
};
pub use error::{ApiError, ApiResult};
pub use filter::{DEFAULT_PER_PAGE, ListFilter, MAX_PER_PAGE};
pub use format::{format_date, format_number};
pub use list::{FetchOutcome, ListSource, ListState, ListStore};
pub use models::{
    AuthPayload, Category, CategoryInput, CategoryRef, Gender, LoginInput, Product, ProductInput,
    RegisterInput, Transaction, TransactionDetail, TransactionInput, TransactionItemInput,
    TransactionKind, User, UserUpdateInput,
};
pub use mutation::{Mutated, MutationRunner};
pub use notify::{BufferNotifier, NoticeLevel, Notify, TracingNotifier};
pub use session::{
    AUTH_COOKIE_NAME, MemorySessionStorage, PersistedSession, SESSION_STORAGE_KEY, SessionSnapshot,
    SessionStorage, SessionStore, TokenMirror,
};
pub use table::{
    Column, DataTable, EmptyKind, PAGE_WINDOW, Pager, SortDir, TableBody, TableUiState, page_window,
};

// Схемы входных данных проверяются вызывающей стороной до мутации;
// реэкспорт избавляет крейты-потребители от прямой зависимости.
pub use validator::Validate;
