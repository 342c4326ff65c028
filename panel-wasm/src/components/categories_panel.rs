use std::time::Duration;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use panel_core::{
    Category, CategoryInput, Column, DEFAULT_PER_PAGE, DataTable, Debouncer, ListFilter,
    ListState, PageMeta, TableBody, TableUiState, Validate, format_date,
};

use crate::api;
use crate::components::data_table::{now_ms, render_body, render_pager, schedule};
use crate::state::AppState;

const SEARCH_DELAY: Duration = Duration::from_millis(300);

fn columns() -> DataTable<Category> {
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

#[component]
pub(crate) fn CategoriesPanel(state: AppState) -> impl IntoView {
    let items = RwSignal::new(Vec::<Category>::new());
    let meta = RwSignal::new(PageMeta::default());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let search = RwSignal::new(String::new());
    let debouncer = RwSignal::new(Debouncer::<String>::new(SEARCH_DELAY));

    let table = StoredValue::new(columns());

    let form_nama = RwSignal::new(String::new());
    let form_deskripsi = RwSignal::new(String::new());
    let editing_id = RwSignal::new(None::<i64>);

    let filter_for = move |page: u32, term: &str| ListFilter {
        s: {
            let term = term.trim();
            (!term.is_empty()).then(|| term.to_string())
        },
        page: Some(page),
        per_page: Some(DEFAULT_PER_PAGE),
    };

    let fetch = Callback::new(move |filter: ListFilter| {
        loading.set(true);
        spawn_local(async move {
            match api::list_categories(&filter).await {
                Ok(page) => {
                    items.set(page.items);
                    meta.set(page.meta);
                    error.set(None);
                }
                Err(err) => {
                    items.set(Vec::new());
                    error.set(Some(err.user_message()));
                }
            }
            loading.set(false);
        });
    });

    fetch.run(filter_for(1, ""));

    // поиск уходит на сервер только после паузы в наборе
    let on_search = move |ev| {
        let value = event_target_value(&ev);
        search.set(value.clone());
        debouncer.update(|d| d.input(value, now_ms()));
        schedule(SEARCH_DELAY + Duration::from_millis(20), move || {
            // таймер может пережить панель: сигнал трогаем через try_update
            let settled = debouncer.try_update(|d| d.poll(now_ms())).flatten();
            if let Some(term) = settled {
                fetch.run(filter_for(1, &term));
            }
        });
    };

    let on_page = Callback::new(move |page: u32| {
        fetch.run(filter_for(page, &search.get()));
    });

    let reset_form = move || {
        form_nama.set(String::new());
        form_deskripsi.set(String::new());
        editing_id.set(None);
    };

    let on_submit = Callback::new({
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let input = CategoryInput {
                nama_kategori: form_nama.get().trim().to_string(),
                deskripsi_kategori: {
                    let deskripsi = form_deskripsi.get().trim().to_string();
                    (!deskripsi.is_empty()).then_some(deskripsi)
                },
            };
            if input.validate().is_err() {
                state.set_error("Название категории должно быть не короче 2 символов");
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                let result = match editing_id.get_untracked() {
                    Some(id) => api::update_category(id, &input).await,
                    None => api::create_category(&input).await,
                };
                match result {
                    Ok(mutated) => {
                        state2.set_notice(mutated.message);
                        reset_form();
                        // мутация не обновляет список: перечитываем явно
                        fetch.run(filter_for(
                            meta.get_untracked().current_page,
                            &search.get_untracked(),
                        ));
                    }
                    Err(err) => state2.set_error(err.user_message()),
                }
                state2.loading.set(false);
            });
        }
    });

    let on_edit = Callback::new(move |id: i64| {
        let Some(category) = items.get().into_iter().find(|c| c.id == id) else {
            return;
        };
        editing_id.set(Some(id));
        form_nama.set(category.nama_kategori);
        form_deskripsi.set(category.deskripsi_kategori.unwrap_or_default());
    });

    let on_delete = Callback::new({
        let state = state.clone();
        move |id: i64| {
            state.clear_error();
            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::delete_category(id).await {
                    Ok(mutated) => {
                        state2.set_notice(mutated.message);
                        fetch.run(filter_for(
                            meta.get_untracked().current_page,
                            &search.get_untracked(),
                        ));
                    }
                    Err(err) => state2.set_error(err.user_message()),
                }
                state2.loading.set(false);
            });
        }
    });

    let list_state = move || ListState {
        items: items.get(),
        meta: meta.get(),
        loading: loading.get(),
        error: error.get(),
    };
    let ui_state = move || TableUiState {
        search: search.get(),
        ..TableUiState::default()
    };

    let state_for_form = state.clone();

    view! {
        <section class="categories">
            <h2>"Категории"</h2>

            <input
                class="search"
                placeholder="Поиск категорий..."
                prop:value=move || search.get()
                on:input=on_search
            />

            <table class="data-table">
                <thead>
                    <tr>
                        {move || {
                            table
                                .with_value(|t| t.headers(&ui_state()))
                                .into_iter()
                                .map(|header| view! { <th>{header}</th> })
                                .collect_view()
                        }}
                        <th>"Действия"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let body = table.with_value(|t| t.body(&list_state(), &ui_state()));
                        let cols = table.with_value(|t| t.headers(&ui_state()).len()) + 1;
                        match body {
                            TableBody::Rows(_) => items
                                .get()
                                .into_iter()
                                .map(|category| {
                                    let id = category.id;
                                    let cells = table.with_value(|t| {
                                        t.visible_columns(&ui_state())
                                            .iter()
                                            .map(|column| column.cell(&category))
                                            .collect::<Vec<_>>()
                                    });
                                    view! {
                                        <tr>
                                            {cells
                                                .into_iter()
                                                .map(|cell| view! { <td>{cell}</td> })
                                                .collect_view()}
                                            <td>
                                                <button on:click=move |_| on_edit.run(id)>
                                                    "Изменить"
                                                </button>
                                                <button on:click=move |_| on_delete.run(id)>
                                                    "Удалить"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                                .into_any(),
                            other => render_body(other, cols),
                        }
                    }}
                </tbody>
            </table>

            {move || render_pager(&meta.get(), on_page)}

            <h3>
                {move || {
                    if editing_id.get().is_some() {
                        "Изменение категории"
                    } else {
                        "Новая категория"
                    }
                }}
            </h3>
            <form on:submit=move |ev| on_submit.run(ev)>
                <input
                    placeholder="название"
                    prop:value=move || form_nama.get()
                    on:input=move |ev| form_nama.set(event_target_value(&ev))
                />
                <input
                    placeholder="описание"
                    prop:value=move || form_deskripsi.get()
                    on:input=move |ev| form_deskripsi.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || state_for_form.loading.get()>
                    {move || if editing_id.get().is_some() { "Сохранить" } else { "Создать" }}
                </button>
                <Show when=move || editing_id.get().is_some()>
                    <button type="button" on:click=move |_| reset_form()>
                        "Отмена"
                    </button>
                </Show>
            </form>
        </section>
    }
}
