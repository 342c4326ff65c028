use serde::Serialize;

/// Размер страницы по умолчанию.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Максимальный размер страницы, который принимает бэкенд.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Параметры выборки списка: поиск и пагинация.
///
/// Отсутствующие ключи не сериализуются вовсе — в запрос никогда не
/// попадает литеральное `undefined` или пустое значение.
pub struct ListFilter {
    /// Строка поиска (`s` в API бэкенда).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    /// Номер страницы, начиная с 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Размер страницы.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListFilter {
    /// Фильтр с одним поисковым запросом.
    pub fn search(s: impl Into<String>) -> Self {
        Self {
            s: Some(s.into()),
            ..Self::default()
        }
    }

    /// Фильтр с номером страницы.
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Накладывает `overlay` поверх `self`: ключи из `overlay` побеждают,
    /// отсутствующие берутся из базового фильтра.
    pub fn merged(&self, overlay: Option<&ListFilter>) -> ListFilter {
        let Some(overlay) = overlay else {
            return self.clone();
        };
        ListFilter {
            s: overlay.s.clone().or_else(|| self.s.clone()),
            page: overlay.page.or(self.page),
            per_page: overlay.per_page.or(self.per_page),
        }
    }

    /// Пары «ключ-значение» для строки запроса; `None` опущены.
    ///
    /// Нужен транспортам без serde-сериализации query (`gloo-net`).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(s) = &self.s {
            pairs.push(("s", s.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_prefers_overlay_keys() {
        let base = ListFilter {
            s: Some("kopi".to_string()),
            page: Some(2),
            per_page: Some(10),
        };
        let overlay = ListFilter::page(5);

        let effective = base.merged(Some(&overlay));
        assert_eq!(effective.s.as_deref(), Some("kopi"));
        assert_eq!(effective.page, Some(5));
        assert_eq!(effective.per_page, Some(10));
    }

    #[test]
    fn merged_without_overlay_clones_base() {
        let base = ListFilter::search("teh");
        assert_eq!(base.merged(None), base);
    }

    #[test]
    fn absent_keys_are_omitted_from_query() {
        let filter = ListFilter::search("gula");
        let pairs = filter.query_pairs();
        assert_eq!(pairs, vec![("s", "gula".to_string())]);
    }

    #[test]
    fn empty_filter_serializes_to_no_keys() {
        let filter = ListFilter::default();
        assert!(filter.query_pairs().is_empty());
        assert_eq!(serde_json::to_string(&filter).expect("serialize"), "{}");
    }
}
