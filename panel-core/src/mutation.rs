use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ApiError, ApiResult};
use crate::notify::Notify;

#[derive(Debug, Clone)]
/// Результат мутации: значение и серверное сообщение для уведомления.
pub struct Mutated<T> {
    /// Созданная/обновлённая сущность (`()` у удаления).
    pub value: T,
    /// Сообщение сервера.
    pub message: String,
}

impl<T> Mutated<T> {
    /// Собирает результат мутации.
    pub fn new(value: T, message: impl Into<String>) -> Self {
        Self {
            value,
            message: message.into(),
        }
    }
}

/// Хук одиночной записи: флаг занятости и уведомления.
///
/// На каждый вызов уходит ровно одно уведомление — успех или ошибка,
/// никогда оба и никогда ноль (если вызывающий дождался завершения).
/// Исключение — 401: его глобально обрабатывает сессия, и дублировать
/// редирект toast-ом не нужно. Ошибка возвращается вызывающему уже после
/// уведомления, чтобы тот мог отреагировать (например, не закрывать
/// форму), не организуя второй показ. Списки хук не перезагружает:
/// refetch после успешной мутации — явная забота вызывающего.
pub struct MutationRunner {
    notifier: Arc<dyn Notify>,
    busy: AtomicBool,
}

impl MutationRunner {
    /// Создаёт хук с каналом уведомлений.
    pub fn new(notifier: Arc<dyn Notify>) -> Self {
        Self {
            notifier,
            busy: AtomicBool::new(false),
        }
    }

    /// Идёт ли сейчас запись.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Выполняет одну мутацию.
    pub async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<Mutated<T>>>,
    {
        self.busy.store(true, Ordering::SeqCst);
        let result = op.await;
        self.busy.store(false, Ordering::SeqCst);

        match result {
            Ok(mutated) => {
                let message = if mutated.message.trim().is_empty() {
                    "Готово".to_string()
                } else {
                    mutated.message
                };
                self.notifier.success(&message);
                Ok(mutated.value)
            }
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{BufferNotifier, NoticeLevel};

    fn runner() -> (MutationRunner, Arc<BufferNotifier>) {
        let notifier = Arc::new(BufferNotifier::new());
        (MutationRunner::new(notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn success_notifies_once_with_server_message() {
        let (runner, notifier) = runner();

        let value = runner
            .run(async { Ok(Mutated::new(7_i64, "Kategori berhasil dibuat")) })
            .await
            .expect("mutation must succeed");

        assert_eq!(value, 7);
        assert_eq!(
            notifier.drain(),
            vec![(
                NoticeLevel::Success,
                "Kategori berhasil dibuat".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn blank_server_message_gets_a_fallback() {
        let (runner, notifier) = runner();

        runner
            .run(async { Ok(Mutated::new((), "  ")) })
            .await
            .expect("mutation must succeed");

        assert_eq!(
            notifier.drain(),
            vec![(NoticeLevel::Success, "Готово".to_string())]
        );
    }

    #[tokio::test]
    async fn failure_notifies_once_and_returns_error() {
        let (runner, notifier) = runner();

        let result: ApiResult<()> = runner
            .run(async { Err(ApiError::Network("connection refused".to_string())) })
            .await;

        assert!(matches!(result, Err(ApiError::Network(_))));
        let notices = notifier.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, NoticeLevel::Error);
        assert!(!runner.is_busy());
    }

    #[tokio::test]
    async fn unauthorized_skips_inline_notification() {
        let (runner, notifier) = runner();

        let result: ApiResult<()> = runner.run(async { Err(ApiError::Unauthorized) }).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(notifier.drain().is_empty());
    }
}
