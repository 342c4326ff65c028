use std::collections::BTreeSet;

use crate::envelope::PageMeta;
use crate::list::ListState;

/// Максимум кнопок с номерами страниц в пагинаторе.
pub const PAGE_WINDOW: u32 = 5;

/// Колонка таблицы: ключ, заголовок и рендер ячейки.
pub struct Column<T> {
    key: &'static str,
    header: String,
    render: Box<dyn Fn(&T) -> String + Send + Sync>,
}

impl<T> Column<T> {
    /// Создаёт колонку.
    pub fn new(
        key: &'static str,
        header: impl Into<String>,
        render: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            header: header.into(),
            render: Box::new(render),
        }
    }

    /// Ключ колонки.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Заголовок колонки.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Значение ячейки для строки.
    pub fn cell(&self, row: &T) -> String {
        (self.render)(row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Направление сортировки.
pub enum SortDir {
    /// По возрастанию.
    Asc,
    /// По убыванию.
    Desc,
}

#[derive(Debug, Clone, Default)]
/// Отображаемое состояние таблицы: только UI, не данные.
pub struct TableUiState {
    /// Эхо строки поиска; по нему различаются виды пустого состояния.
    pub search: String,
    /// Сортировка по ключу колонки.
    pub sort: Option<(&'static str, SortDir)>,
    /// Скрытые колонки.
    pub hidden: BTreeSet<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Вид пустого состояния.
pub enum EmptyKind {
    /// Данных ещё нет вообще.
    NoData,
    /// По поисковому запросу ничего не нашлось.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Тело таблицы, готовое к отрисовке.
pub enum TableBody {
    /// Строки-скелетоны на время загрузки.
    Skeleton {
        /// Сколько строк рисовать.
        rows: usize,
        /// Сколько колонок в каждой строке.
        cols: usize,
    },
    /// Панель ошибки вместо строк.
    Error(String),
    /// Пустое состояние.
    Empty(EmptyKind),
    /// Отрисованные строки (ячейки уже приведены к строкам).
    Rows(Vec<Vec<String>>),
}

/// Обобщённая таблица: колонки и правила отрисовки состояний.
///
/// Таблица не владеет данными — ей передают состояние списка, а она
/// решает, что показывать: скелетоны, ошибку, пустое состояние или
/// строки.
pub struct DataTable<T> {
    columns: Vec<Column<T>>,
    skeleton_rows: usize,
}

impl<T> DataTable<T> {
    /// Таблица с пятью скелетон-строками по умолчанию.
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            skeleton_rows: 5,
        }
    }

    /// Меняет число скелетон-строк.
    pub fn with_skeleton_rows(mut self, rows: usize) -> Self {
        self.skeleton_rows = rows;
        self
    }

    /// Видимые колонки с учётом настроек UI.
    pub fn visible_columns(&self, ui: &TableUiState) -> Vec<&Column<T>> {
        self.columns
            .iter()
            .filter(|column| !ui.hidden.contains(column.key()))
            .collect()
    }

    /// Заголовки видимых колонок.
    pub fn headers(&self, ui: &TableUiState) -> Vec<String> {
        self.visible_columns(ui)
            .iter()
            .map(|column| column.header().to_string())
            .collect()
    }

    /// Тело таблицы из состояния списка.
    ///
    /// Пустой список без поискового запроса — «данных нет», с запросом —
    /// «нет совпадений»: эти состояния обязаны различаться.
    pub fn body(&self, state: &ListState<T>, ui: &TableUiState) -> TableBody {
        let columns = self.visible_columns(ui);
        if state.loading {
            return TableBody::Skeleton {
                rows: self.skeleton_rows,
                cols: columns.len(),
            };
        }
        if let Some(error) = &state.error {
            return TableBody::Error(error.clone());
        }
        if state.items.is_empty() {
            let kind = if ui.search.trim().is_empty() {
                EmptyKind::NoData
            } else {
                EmptyKind::NoMatches
            };
            return TableBody::Empty(kind);
        }

        let mut rows: Vec<Vec<String>> = state
            .items
            .iter()
            .map(|item| columns.iter().map(|column| column.cell(item)).collect())
            .collect();

        if let Some((key, dir)) = ui.sort {
            if let Some(index) = columns.iter().position(|column| column.key() == key) {
                rows.sort_by(|a, b| a[index].cmp(&b[index]));
                if dir == SortDir::Desc {
                    rows.reverse();
                }
            }
        }

        TableBody::Rows(rows)
    }
}

/// Окно номеров страниц: не больше [`PAGE_WINDOW`] кнопок, скользящее
/// вокруг текущей страницы с прижатием к краям.
pub fn page_window(current_page: u32, last_page: u32) -> Vec<u32> {
    if last_page == 0 {
        return Vec::new();
    }
    let current = current_page.clamp(1, last_page);
    if last_page <= PAGE_WINDOW {
        return (1..=last_page).collect();
    }
    if current <= 3 {
        return (1..=PAGE_WINDOW).collect();
    }
    if current >= last_page - 2 {
        return (last_page - (PAGE_WINDOW - 1)..=last_page).collect();
    }
    (current - 2..=current + 2).collect()
}

#[derive(Debug, Clone)]
/// Управление пагинацией поверх метаданных страницы.
pub struct Pager {
    meta: PageMeta,
}

impl Pager {
    /// Пейджер для страницы.
    pub fn new(meta: PageMeta) -> Self {
        Self { meta }
    }

    /// Кнопки с номерами страниц.
    pub fn buttons(&self) -> Vec<u32> {
        page_window(self.meta.current_page, self.meta.last_page)
    }

    /// Номер текущей страницы.
    pub fn current(&self) -> u32 {
        self.meta.current_page
    }

    /// Активна ли кнопка «назад».
    pub fn prev_enabled(&self) -> bool {
        self.meta.prev_page_url.is_some()
    }

    /// Активна ли кнопка «вперёд».
    pub fn next_enabled(&self) -> bool {
        self.meta.next_page_url.is_some()
    }

    /// Проверяет запрос перехода: за границы диапазона не эмитится.
    pub fn request(&self, page: u32) -> Option<u32> {
        if page < 1 || page > self.meta.last_page {
            return None;
        }
        Some(page)
    }

    /// Переход на предыдущую страницу, если она есть.
    pub fn prev(&self) -> Option<u32> {
        if !self.prev_enabled() {
            return None;
        }
        self.request(self.meta.current_page.saturating_sub(1))
    }

    /// Переход на следующую страницу, если она есть.
    pub fn next(&self) -> Option<u32> {
        if !self.next_enabled() {
            return None;
        }
        self.request(self.meta.current_page + 1)
    }

    /// Строка сводки по странице.
    pub fn summary(&self) -> String {
        match (self.meta.from, self.meta.to) {
            (Some(from), Some(to)) => {
                format!("Показаны {from}-{to} из {}", self.meta.total)
            }
            _ => format!("Всего записей: {}", self.meta.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(current: u32, last: u32) -> PageMeta {
        PageMeta {
            current_page: current,
            last_page: last,
            prev_page_url: (current > 1).then(|| format!("?page={}", current - 1)),
            next_page_url: (current < last).then(|| format!("?page={}", current + 1)),
            ..PageMeta::default()
        }
    }

    #[test]
    fn window_clamps_at_the_start() {
        for current in [1, 2, 3] {
            assert_eq!(page_window(current, 20), vec![1, 2, 3, 4, 5], "current={current}");
        }
    }

    #[test]
    fn window_centers_in_the_middle() {
        assert_eq!(page_window(10, 20), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn window_clamps_at_the_end() {
        for current in [18, 19, 20] {
            assert_eq!(
                page_window(current, 20),
                vec![16, 17, 18, 19, 20],
                "current={current}"
            );
        }
    }

    #[test]
    fn window_shrinks_for_short_lists() {
        assert_eq!(page_window(2, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 1), vec![1]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn window_tolerates_out_of_range_current_page() {
        assert_eq!(page_window(99, 20), vec![16, 17, 18, 19, 20]);
        assert_eq!(page_window(0, 20), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn pager_never_emits_out_of_range_pages() {
        let pager = Pager::new(meta(1, 4));
        assert_eq!(pager.request(0), None);
        assert_eq!(pager.request(5), None);
        assert_eq!(pager.request(4), Some(4));
    }

    #[test]
    fn pager_prev_next_follow_urls() {
        let first = Pager::new(meta(1, 4));
        assert!(!first.prev_enabled());
        assert_eq!(first.prev(), None);
        assert_eq!(first.next(), Some(2));

        let last = Pager::new(meta(4, 4));
        assert!(!last.next_enabled());
        assert_eq!(last.next(), None);
        assert_eq!(last.prev(), Some(3));
    }

    #[test]
    fn pager_summary_distinguishes_empty_pages() {
        let mut populated = meta(2, 4);
        populated.from = Some(11);
        populated.to = Some(20);
        populated.total = 31;
        assert_eq!(Pager::new(populated).summary(), "Показаны 11-20 из 31");

        let empty = meta(1, 1);
        assert_eq!(Pager::new(empty).summary(), "Всего записей: 0");
    }

    fn sample_table() -> DataTable<(i64, String)> {
        DataTable::new(vec![
            Column::new("id", "ID", |row: &(i64, String)| row.0.to_string()),
            Column::new("name", "Название", |row: &(i64, String)| row.1.clone()),
        ])
    }

    fn state(items: Vec<(i64, String)>, loading: bool, error: Option<&str>) -> ListState<(i64, String)> {
        ListState {
            items,
            loading,
            error: error.map(str::to_string),
            ..ListState::default()
        }
    }

    #[test]
    fn loading_renders_skeleton_matching_columns() {
        let table = sample_table().with_skeleton_rows(3);
        let body = table.body(&state(Vec::new(), true, None), &TableUiState::default());
        assert_eq!(body, TableBody::Skeleton { rows: 3, cols: 2 });
    }

    #[test]
    fn error_renders_error_panel() {
        let table = sample_table();
        let body = table.body(
            &state(Vec::new(), false, Some("Gagal mengambil data")),
            &TableUiState::default(),
        );
        assert_eq!(body, TableBody::Error("Gagal mengambil data".to_string()));
    }

    #[test]
    fn empty_states_distinguish_search_from_no_data() {
        let table = sample_table();

        let no_data = table.body(&state(Vec::new(), false, None), &TableUiState::default());
        assert_eq!(no_data, TableBody::Empty(EmptyKind::NoData));

        let ui = TableUiState {
            search: "kopi".to_string(),
            ..TableUiState::default()
        };
        let no_matches = table.body(&state(Vec::new(), false, None), &ui);
        assert_eq!(no_matches, TableBody::Empty(EmptyKind::NoMatches));
    }

    #[test]
    fn rows_respect_hidden_columns_and_sort() {
        let table = sample_table();
        let items = vec![(2, "Teh".to_string()), (1, "Kopi".to_string())];

        let mut ui = TableUiState::default();
        ui.sort = Some(("id", SortDir::Asc));
        ui.hidden.insert("name");

        let body = table.body(&state(items, false, None), &ui);
        assert_eq!(
            body,
            TableBody::Rows(vec![vec!["1".to_string()], vec!["2".to_string()]])
        );
        assert_eq!(table.headers(&ui), vec!["ID".to_string()]);
    }
}
