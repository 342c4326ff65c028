use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::envelope::{Page, PageMeta};
use crate::error::{ApiError, ApiResult};
use crate::filter::ListFilter;
use crate::notify::Notify;

#[async_trait]
/// Источник страниц для хука списка; реализуется ресурсными сервисами.
pub trait ListSource<T>: Send + Sync {
    /// Загружает одну страницу по фильтру.
    async fn fetch_page(&self, filter: &ListFilter) -> ApiResult<Page<T>>;
}

#[derive(Debug, Clone)]
/// Видимое состояние списка.
pub struct ListState<T> {
    /// Сущности текущей страницы.
    pub items: Vec<T>,
    /// Метаданные пагинации.
    pub meta: PageMeta,
    /// Идёт ли сейчас запрос.
    pub loading: bool,
    /// Текст ошибки последней загрузки.
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::default(),
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Исход вызова [`ListStore::refetch`].
pub enum FetchOutcome {
    /// Страница получена и применена.
    Fetched,
    /// Запрос не отправлялся: такой же уже в полёте или уже применён.
    Deduplicated,
    /// Ответ отброшен: после этого запроса был выдан более новый.
    Superseded,
    /// Сервер ответил 401; дальнейшую обработку взяла на себя сессия.
    Unauthorized,
    /// Загрузка завершилась ошибкой; видимый список очищен.
    Failed,
}

struct Inner<T> {
    state: ListState<T>,
    /// Номер последнего выданного запроса; побеждает всегда он.
    latest_seq: u64,
    /// Фильтр последнего выданного и ещё не завершённого запроса.
    in_flight: Option<(u64, ListFilter)>,
    /// Фильтр последней успешно применённой загрузки.
    applied: Option<ListFilter>,
}

impl<T> Default for Inner<T> {
    fn default() -> Self {
        Self {
            state: ListState::default(),
            latest_seq: 0,
            in_flight: None,
            applied: None,
        }
    }
}

/// Хук списка: базовый фильтр, кэш одной страницы и перезагрузка.
///
/// Кэш живёт столько же, сколько сам хук, и на каждой успешной загрузке
/// заменяется целиком. Гарантия порядка: применяется результат последнего
/// выданного запроса, независимо от порядка прихода ответов; устаревшие
/// ответы просто отбрасываются.
pub struct ListStore<T> {
    source: Arc<dyn ListSource<T>>,
    notifier: Arc<dyn Notify>,
    base: ListFilter,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> ListStore<T> {
    /// Создаёт хук поверх источника с базовым фильтром.
    pub fn new(source: Arc<dyn ListSource<T>>, notifier: Arc<dyn Notify>, base: ListFilter) -> Self {
        Self {
            source,
            notifier,
            base,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Снимок текущего состояния.
    pub fn state(&self) -> ListState<T> {
        self.lock().state.clone()
    }

    /// Эффективный фильтр: `overlay` поверх базового.
    pub fn effective_filter(&self, overlay: Option<&ListFilter>) -> ListFilter {
        self.base.merged(overlay)
    }

    /// Перезагружает список.
    ///
    /// Повторный вызов с тем же эффективным фильтром схлопывается: пока
    /// идентичный запрос в полёте или его результат уже применён, новый не
    /// выдаётся (если не попросили `force`). Новые значения фильтра никогда
    /// не блокируются. При ошибке видимый список очищается, `error`
    /// заполняется человекочитаемой причиной, и в канал уведомлений уходит
    /// ровно одно сообщение. Автоматических повторов нет.
    pub async fn refetch(&self, overlay: Option<ListFilter>, force: bool) -> FetchOutcome {
        let filter = self.base.merged(overlay.as_ref());

        let seq = {
            let mut inner = self.lock();
            if !force {
                if let Some((_, in_flight)) = &inner.in_flight {
                    if *in_flight == filter {
                        tracing::debug!(target: "panel::list", "дедупликация: такой же запрос в полёте");
                        return FetchOutcome::Deduplicated;
                    }
                }
                if !inner.state.loading
                    && inner.state.error.is_none()
                    && inner.applied.as_ref() == Some(&filter)
                {
                    tracing::debug!(target: "panel::list", "дедупликация: фильтр уже применён");
                    return FetchOutcome::Deduplicated;
                }
            }

            inner.latest_seq += 1;
            let seq = inner.latest_seq;
            inner.in_flight = Some((seq, filter.clone()));
            // старые данные остаются на экране, пока идёт загрузка
            inner.state.loading = true;
            seq
        };

        let result = self.source.fetch_page(&filter).await;

        let mut inner = self.lock();
        if seq != inner.latest_seq {
            tracing::debug!(target: "panel::list", seq, "ответ устарел и отброшен");
            return FetchOutcome::Superseded;
        }
        inner.in_flight = None;
        inner.state.loading = false;

        match result {
            Ok(page) => {
                inner.state.items = page.items;
                inner.state.meta = page.meta;
                inner.state.error = None;
                inner.applied = Some(filter);
                FetchOutcome::Fetched
            }
            Err(ApiError::Unauthorized) => {
                // 401 не показывается как обычная ошибка списка: сессию
                // сбрасывает транспорт, редирект делает её колбэк
                inner.state.items = Vec::new();
                inner.state.error = None;
                inner.applied = None;
                FetchOutcome::Unauthorized
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(target: "panel::list", "загрузка списка не удалась: {err}");
                inner.state.items = Vec::new();
                inner.state.error = Some(message.clone());
                inner.applied = None;
                drop(inner);
                self.notifier.error(&message);
                FetchOutcome::Failed
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().expect("list store mutex poisoned")
    }
}
