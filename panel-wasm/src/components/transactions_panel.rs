use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use panel_core::{
    Column, DEFAULT_PER_PAGE, DataTable, ListFilter, ListState, PageMeta, TableBody, TableUiState,
    Transaction, TransactionInput, TransactionItemInput, TransactionKind, Validate, format_date,
    format_number,
};

use crate::api;
use crate::components::data_table::{render_body, render_pager};
use crate::state::AppState;

fn columns() -> DataTable<Transaction> {
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

#[component]
pub(crate) fn TransactionsPanel(state: AppState) -> impl IntoView {
    let items = RwSignal::new(Vec::<Transaction>::new());
    let meta = RwSignal::new(PageMeta::default());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let table = StoredValue::new(columns());

    let form_jenis = RwSignal::new("in".to_string());
    let form_produk_id = RwSignal::new(String::new());
    let form_jumlah = RwSignal::new(String::new());
    let form_catatan = RwSignal::new(String::new());

    let filter_for = move |page: u32| ListFilter {
        s: None,
        page: Some(page),
        per_page: Some(DEFAULT_PER_PAGE),
    };

    let fetch = Callback::new(move |filter: ListFilter| {
        loading.set(true);
        spawn_local(async move {
            match api::list_transactions(&filter).await {
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

    fetch.run(filter_for(1));

    let on_page = Callback::new(move |page: u32| {
        fetch.run(filter_for(page));
    });

    let on_submit = Callback::new({
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let Some(jenis_transaksi) = TransactionKind::parse(&form_jenis.get()) else {
                state.set_error("Тип транзакции: ожидается in или out");
                return;
            };
            let Ok(produk_id) = form_produk_id.get().trim().parse::<i64>() else {
                state.set_error("Укажите числовой id товара");
                return;
            };
            let Ok(jumlah_produk) = form_jumlah.get().trim().parse::<i64>() else {
                state.set_error("Количество должно быть целым числом");
                return;
            };

            let input = TransactionInput {
                jenis_transaksi,
                catatan_transaksi: {
                    let catatan = form_catatan.get().trim().to_string();
                    (!catatan.is_empty()).then_some(catatan)
                },
                produk: vec![TransactionItemInput {
                    produk_id,
                    jumlah_produk,
                }],
            };
            if input.validate().is_err() {
                state.set_error("Количество должно быть строго положительным");
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::create_transaction(&input).await {
                    Ok(mutated) => {
                        state2.set_notice(mutated.message);
                        form_produk_id.set(String::new());
                        form_jumlah.set(String::new());
                        form_catatan.set(String::new());
                        fetch.run(filter_for(meta.get_untracked().current_page));
                    }
                    Err(err) => state2.set_error(err.user_message()),
                }
                state2.loading.set(false);
            });
        }
    });

    let on_delete = Callback::new({
        let state = state.clone();
        move |id: i64| {
            state.clear_error();
            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::delete_transaction(id).await {
                    Ok(mutated) => {
                        state2.set_notice(mutated.message);
                        fetch.run(filter_for(meta.get_untracked().current_page));
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
    let ui_state = move || TableUiState::default();

    let state_for_form = state.clone();

    view! {
        <section class="transactions">
            <h2>"Транзакции склада"</h2>

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
                                .map(|transaction| {
                                    let id = transaction.id;
                                    let cells = table.with_value(|t| {
                                        t.visible_columns(&ui_state())
                                            .iter()
                                            .map(|column| column.cell(&transaction))
                                            .collect::<Vec<_>>()
                                    });
                                    view! {
                                        <tr>
                                            {cells
                                                .into_iter()
                                                .map(|cell| view! { <td>{cell}</td> })
                                                .collect_view()}
                                            <td>
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

            <h3>"Новая транзакция"</h3>
            <form on:submit=move |ev| on_submit.run(ev)>
                <select on:change=move |ev| form_jenis.set(event_target_value(&ev))>
                    <option value="in" selected=move || form_jenis.get() == "in">
                        "Приход"
                    </option>
                    <option value="out" selected=move || form_jenis.get() == "out">
                        "Расход"
                    </option>
                </select>
                <input
                    placeholder="id товара"
                    prop:value=move || form_produk_id.get()
                    on:input=move |ev| form_produk_id.set(event_target_value(&ev))
                />
                <input
                    placeholder="количество"
                    prop:value=move || form_jumlah.get()
                    on:input=move |ev| form_jumlah.set(event_target_value(&ev))
                />
                <input
                    placeholder="примечание"
                    prop:value=move || form_catatan.get()
                    on:input=move |ev| form_catatan.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || state_for_form.loading.get()>
                    "Провести"
                </button>
            </form>
        </section>
    }
}
