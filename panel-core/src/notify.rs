use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Уровень уведомления.
pub enum NoticeLevel {
    /// Операция удалась.
    Success,
    /// Операция не удалась.
    Error,
}

/// Глобальный канал пользовательских уведомлений (аналог toast).
///
/// Хуки пишут сюда ровно одно сообщение на завершённую операцию;
/// как именно оно показывается — дело конкретного интерфейса.
pub trait Notify: Send + Sync {
    /// Уведомление об успешной операции.
    fn success(&self, message: &str);
    /// Уведомление об ошибке.
    fn error(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
/// Уведомления уходят в лог через `tracing`.
pub struct TracingNotifier;

impl Notify for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "panel::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "panel::notify", "{message}");
    }
}

#[derive(Debug, Default)]
/// Копит уведомления в памяти до явного забора.
///
/// Используется в тестах и там, где показ отложен (CLI печатает
/// накопленное после завершения команды).
pub struct BufferNotifier {
    entries: Mutex<Vec<(NoticeLevel, String)>>,
}

impl BufferNotifier {
    /// Пустой буфер.
    pub fn new() -> Self {
        Self::default()
    }

    /// Забирает накопленные уведомления, очищая буфер.
    pub fn drain(&self) -> Vec<(NoticeLevel, String)> {
        std::mem::take(&mut *self.entries.lock().expect("notifier mutex poisoned"))
    }

    fn push(&self, level: NoticeLevel, message: &str) {
        self.entries
            .lock()
            .expect("notifier mutex poisoned")
            .push((level, message.to_string()));
    }
}

impl Notify for BufferNotifier {
    fn success(&self, message: &str) {
        self.push(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NoticeLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_collects_in_order_and_drains() {
        let notifier = BufferNotifier::new();
        notifier.success("created");
        notifier.error("failed");

        let entries = notifier.drain();
        assert_eq!(
            entries,
            vec![
                (NoticeLevel::Success, "created".to_string()),
                (NoticeLevel::Error, "failed".to_string()),
            ]
        );
        assert!(notifier.drain().is_empty());
    }
}
