use std::time::Duration;

#[derive(Debug, Clone)]
/// Дебаунс потока значений по явным отметкам времени.
///
/// Структура чистая и не заводит таймеров: моменты времени передаются
/// снаружи как смещения от произвольного нуля (реальные в продакшене,
/// смоделированные в тестах), поэтому поведение полностью
/// детерминировано и не зависит от UI-фреймворка.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debouncer<T> {
    /// Дебаунсер с заданной задержкой.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Регистрирует новое значение в момент `at`.
    ///
    /// Каждый ввод перезаписывает предыдущий и заново взводит задержку.
    pub fn input(&mut self, value: T, at: Duration) {
        self.pending = Some((value, at));
    }

    /// Отдаёт устоявшееся значение, если с последнего ввода прошло не
    /// меньше задержки; иначе `None`. Значение отдаётся один раз.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_sub(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Есть ли значение, ещё не отданное наружу.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn value_settles_only_after_delay() {
        let mut debouncer = Debouncer::new(MS_300);
        debouncer.input("k", Duration::from_millis(0));

        assert_eq!(debouncer.poll(Duration::from_millis(299)), None);
        assert_eq!(debouncer.poll(Duration::from_millis(300)), Some("k"));
    }

    #[test]
    fn rapid_typing_yields_only_last_value() {
        let mut debouncer = Debouncer::new(MS_300);
        debouncer.input("k", Duration::from_millis(0));
        debouncer.input("ko", Duration::from_millis(100));
        debouncer.input("kopi", Duration::from_millis(200));

        // с момента последнего ввода задержка ещё не прошла
        assert_eq!(debouncer.poll(Duration::from_millis(400)), None);
        assert_eq!(debouncer.poll(Duration::from_millis(500)), Some("kopi"));
    }

    #[test]
    fn settled_value_is_emitted_once() {
        let mut debouncer = Debouncer::new(MS_300);
        debouncer.input("teh", Duration::from_millis(0));

        assert_eq!(debouncer.poll(Duration::from_millis(301)), Some("teh"));
        assert_eq!(debouncer.poll(Duration::from_millis(999)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn empty_debouncer_stays_quiet() {
        let mut debouncer: Debouncer<String> = Debouncer::new(MS_300);
        assert_eq!(debouncer.poll(Duration::from_millis(1000)), None);
    }
}
