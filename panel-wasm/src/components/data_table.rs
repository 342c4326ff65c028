use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;

use panel_core::{EmptyKind, PageMeta, Pager, TableBody};

/// Миллисекунды от эпохи как `Duration`; отметки времени для дебаунсера.
pub(crate) fn now_ms() -> Duration {
    Duration::from_millis(js_sys::Date::now() as u64)
}

/// Одноразовый таймер поверх `setTimeout`.
pub(crate) fn schedule(delay: Duration, callback: impl FnOnce() + 'static) {
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once_into_js(callback);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.unchecked_ref(),
        delay.as_millis() as i32,
    );
}

/// Рисует состояние тела таблицы, кроме обычных строк: скелетоны на
/// время загрузки, панель ошибки и оба вида пустого состояния.
pub(crate) fn render_body(body: TableBody, total_cols: usize) -> AnyView {
    match body {
        TableBody::Skeleton { rows, cols } => (0..rows)
            .map(|_| {
                view! {
                    <tr class="skeleton">
                        {(0..cols.max(1)).map(|_| view! { <td>"…"</td> }).collect_view()}
                    </tr>
                }
            })
            .collect_view()
            .into_any(),
        TableBody::Error(error) => view! {
            <tr>
                <td colspan=total_cols.to_string() class="error">
                    "Не удалось загрузить данные: " {error}
                </td>
            </tr>
        }
        .into_any(),
        TableBody::Empty(EmptyKind::NoData) => view! {
            <tr>
                <td colspan=total_cols.to_string() class="empty">"Данных пока нет"</td>
            </tr>
        }
        .into_any(),
        TableBody::Empty(EmptyKind::NoMatches) => view! {
            <tr>
                <td colspan=total_cols.to_string() class="empty">
                    "По запросу ничего не найдено"
                </td>
            </tr>
        }
        .into_any(),
        TableBody::Rows(rows) => rows
            .into_iter()
            .map(|row| {
                view! {
                    <tr>{row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}</tr>
                }
            })
            .collect_view()
            .into_any(),
    }
}

/// Пагинатор: окно из пяти кнопок, «назад»/«вперёд» по ссылкам страницы.
pub(crate) fn render_pager(meta: &PageMeta, on_page: Callback<u32>) -> AnyView {
    let pager = Pager::new(meta.clone());
    let current = pager.current();

    let prev = match pager.prev() {
        Some(page) => {
            view! { <button on:click=move |_| on_page.run(page)>"Назад"</button> }.into_any()
        }
        None => view! { <button disabled=true>"Назад"</button> }.into_any(),
    };
    let next = match pager.next() {
        Some(page) => {
            view! { <button on:click=move |_| on_page.run(page)>"Вперёд"</button> }.into_any()
        }
        None => view! { <button disabled=true>"Вперёд"</button> }.into_any(),
    };

    let buttons = pager
        .buttons()
        .into_iter()
        .map(|page| {
            let class = if page == current { "page current" } else { "page" };
            view! {
                <button class=class on:click=move |_| on_page.run(page)>
                    {page.to_string()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="pager">
            {prev}
            {buttons}
            {next}
            <span class="summary">{pager.summary()}</span>
        </div>
    }
    .into_any()
}
