use panel_core::{
    Category, Column, DataTable, EmptyKind, ListState, PageMeta, Pager, Product, TableBody,
    TableUiState, Transaction, format_date, format_number,
};

/// Колонки таблицы категорий.
pub fn category_table() -> DataTable<Category> {
    DataTable::new(vec![
        Column::new("id", "ID", |c: &Category| c.id.to_string()),
        Column::new("nama_kategori", "Название", |c: &Category| {
            c.nama_kategori.clone()
        }),
        Column::new("deskripsi_kategori", "Описание", |c: &Category| {
            c.deskripsi_kategori.clone().unwrap_or_default()
        }),
        Column::new("created_at", "Создана", |c: &Category| {
            format_date(&c.created_at)
        }),
    ])
}

/// Колонки таблицы товаров.
pub fn product_table() -> DataTable<Product> {
    DataTable::new(vec![
        Column::new("id", "ID", |p: &Product| p.id.to_string()),
        Column::new("nama_produk", "Название", |p: &Product| {
            p.nama_produk.clone()
        }),
        Column::new("kategori", "Категория", |p: &Product| {
            p.kategori_produk
                .as_ref()
                .map(|k| k.nama_kategori.clone())
                .unwrap_or_else(|| format!("#{}", p.kategori_produk_id))
        }),
        Column::new("stok_produk", "Остаток", |p: &Product| {
            format_number(p.stok_produk)
        }),
        Column::new("created_at", "Создан", |p: &Product| {
            format_date(&p.created_at)
        }),
    ])
}

/// Колонки таблицы транзакций.
pub fn transaction_table() -> DataTable<Transaction> {
    DataTable::new(vec![
        Column::new("id", "ID", |t: &Transaction| t.id.to_string()),
        Column::new("jenis_transaksi", "Тип", |t: &Transaction| {
            t.jenis_transaksi.label().to_string()
        }),
        Column::new("items", "Позиций", |t: &Transaction| {
            format!(
                "{} ({} шт.)",
                t.detail_transaksis.len(),
                format_number(t.total_items())
            )
        }),
        Column::new("user", "Автор", |t: &Transaction| {
            t.user
                .as_ref()
                .map(|u| u.full_name())
                .unwrap_or_else(|| format!("#{}", t.user_id))
        }),
        Column::new("catatan_transaksi", "Примечание", |t: &Transaction| {
            t.catatan_transaksi.clone().unwrap_or_default()
        }),
        Column::new("created_at", "Создана", |t: &Transaction| {
            format_date(&t.created_at)
        }),
    ])
}

/// Выравнивает строки по ширине колонок.
fn layout(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if index < widths.len() {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }
    }

    let render_line = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(index, cell)| format!("{cell:<width$}", width = widths.get(index).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render_line(headers));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2));
    for row in rows {
        out.push('\n');
        out.push_str(&render_line(row));
    }
    out
}

/// Печатает таблицу со строками или соответствующее состояние.
pub fn print_table<T>(table: &DataTable<T>, state: &ListState<T>, ui: &TableUiState) {
    match table.body(state, ui) {
        TableBody::Skeleton { .. } => println!("Загрузка..."),
        TableBody::Error(error) => println!("Не удалось загрузить данные: {error}"),
        TableBody::Empty(EmptyKind::NoData) => println!("Данных пока нет"),
        TableBody::Empty(EmptyKind::NoMatches) => {
            println!("По запросу «{}» ничего не найдено", ui.search.trim());
        }
        TableBody::Rows(rows) => {
            println!("{}", layout(&table.headers(ui), &rows));
        }
    }
}

/// Печатает строку пагинатора под таблицей.
pub fn print_pager(meta: &PageMeta) {
    let pager = Pager::new(meta.clone());
    let buttons = pager
        .buttons()
        .iter()
        .map(|page| {
            if *page == pager.current() {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!("{} | страницы: {}", pager.summary(), buttons);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_pads_cells_to_column_width() {
        let headers = vec!["ID".to_string(), "Название".to_string()];
        let rows = vec![
            vec!["1".to_string(), "Kopi".to_string()],
            vec!["12".to_string(), "Teh Melati".to_string()],
        ];

        let rendered = layout(&headers, &rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with("1 "));
        assert!(lines[3].starts_with("12"));
    }

    #[test]
    fn tables_expose_expected_headers() {
        let ui = TableUiState::default();
        assert_eq!(
            category_table().headers(&ui),
            vec!["ID", "Название", "Описание", "Создана"]
        );
        assert_eq!(product_table().headers(&ui).len(), 5);
        assert_eq!(transaction_table().headers(&ui).len(), 6);
    }
}
