use std::time::Duration;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use panel_core::{
    Column, DEFAULT_PER_PAGE, DataTable, Debouncer, ListFilter, ListState, PageMeta, Product,
    ProductInput, TableBody, TableUiState, Validate, format_date, format_number,
};

use crate::api;
use crate::components::data_table::{now_ms, render_body, render_pager, schedule};
use crate::state::AppState;

const SEARCH_DELAY: Duration = Duration::from_millis(300);

fn columns() -> DataTable<Product> {
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

#[component]
pub(crate) fn ProductsPanel(state: AppState) -> impl IntoView {
    let items = RwSignal::new(Vec::<Product>::new());
    let meta = RwSignal::new(PageMeta::default());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let search = RwSignal::new(String::new());
    let debouncer = RwSignal::new(Debouncer::<String>::new(SEARCH_DELAY));

    let table = StoredValue::new(columns());

    let form_nama = RwSignal::new(String::new());
    let form_deskripsi = RwSignal::new(String::new());
    let form_kategori_id = RwSignal::new(String::new());
    let form_stok = RwSignal::new(String::new());
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
            match api::list_products(&filter).await {
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
        form_kategori_id.set(String::new());
        form_stok.set(String::new());
        editing_id.set(None);
    };

    let on_submit = Callback::new({
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let Ok(kategori_produk_id) = form_kategori_id.get().trim().parse::<i64>() else {
                state.set_error("Укажите числовой id категории");
                return;
            };
            let Ok(stok_produk) = form_stok.get().trim().parse::<i64>() else {
                state.set_error("Остаток должен быть целым числом");
                return;
            };

            let input = ProductInput {
                kategori_produk_id,
                nama_produk: form_nama.get().trim().to_string(),
                deskripsi_produk: {
                    let deskripsi = form_deskripsi.get().trim().to_string();
                    (!deskripsi.is_empty()).then_some(deskripsi)
                },
                stok_produk,
                gambar_produk: None,
            };
            if input.validate().is_err() {
                state.set_error(
                    "Проверьте форму: название от 2 символов, остаток не отрицательный",
                );
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                let result = match editing_id.get_untracked() {
                    Some(id) => api::update_product(id, &input).await,
                    None => api::create_product(&input).await,
                };
                match result {
                    Ok(mutated) => {
                        state2.set_notice(mutated.message);
                        reset_form();
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
        let Some(product) = items.get().into_iter().find(|p| p.id == id) else {
            return;
        };
        editing_id.set(Some(id));
        form_nama.set(product.nama_produk);
        form_deskripsi.set(product.deskripsi_produk.unwrap_or_default());
        form_kategori_id.set(product.kategori_produk_id.to_string());
        form_stok.set(product.stok_produk.to_string());
    });

    let on_delete = Callback::new({
        let state = state.clone();
        move |id: i64| {
            state.clear_error();
            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::delete_product(id).await {
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
        <section class="products">
            <h2>"Товары"</h2>

            <input
                class="search"
                placeholder="Поиск товаров..."
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
                                .map(|product| {
                                    let id = product.id;
                                    let cells = table.with_value(|t| {
                                        t.visible_columns(&ui_state())
                                            .iter()
                                            .map(|column| column.cell(&product))
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
                        "Изменение товара"
                    } else {
                        "Новый товар"
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
                <input
                    placeholder="id категории"
                    prop:value=move || form_kategori_id.get()
                    on:input=move |ev| form_kategori_id.set(event_target_value(&ev))
                />
                <input
                    placeholder="остаток"
                    prop:value=move || form_stok.get()
                    on:input=move |ev| form_stok.set(event_target_value(&ev))
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
