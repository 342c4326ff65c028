use leptos::prelude::*;
use leptos::task::spawn_local;

use panel_core::SessionStore;

use crate::api;
use crate::components::auth_panel::AuthPanel;
use crate::components::categories_panel::CategoriesPanel;
use crate::components::products_panel::ProductsPanel;
use crate::components::profile_panel::ProfilePanel;
use crate::components::transactions_panel::TransactionsPanel;
use crate::state::{AppState, Tab};
use crate::storage;

#[component]
pub fn App() -> impl IntoView {
    let session = storage::install_session();
    session.set_expiry_hook(storage::redirect_to_login);

    let state = AppState::new();
    if let Some(user) = session.snapshot().user {
        state.user.set(Some(user));
    }

    let on_logout = Callback::new({
        let state = state.clone();
        move |_: ()| {
            let state2 = state.clone();
            state.loading.set(true);
            spawn_local(async move {
                // серверный logout не критичен: локальная сессия чистится
                // в любом случае
                if api::logout().await.is_err() {
                    web_sys::console::warn_1(&"серверный logout не удался".into());
                }
                let session = SessionStore::global();
                if let Err(err) = session.logout() {
                    state2.set_error(err);
                } else {
                    state2.user.set(None);
                }
                state2.loading.set(false);
            });
        }
    });

    let tab_button = |state: &AppState, tab: Tab, title: &'static str| {
        let current = state.tab;
        view! {
            <button
                class=move || if current.get() == tab { "tab active" } else { "tab" }
                on:click=move |_| current.set(tab)
            >
                {title}
            </button>
        }
    };

    let error_text = {
        let state = state.clone();
        move || state.error.get().unwrap_or_default()
    };
    let notice_text = {
        let state = state.clone();
        move || state.notice.get().unwrap_or_default()
    };

    let state_for_auth_show = state.clone();
    let state_for_panels_show = state.clone();
    let state_for_header = state.clone();
    let state_for_error_show = state.clone();
    let state_for_notice_show = state.clone();
    let state_for_auth = state.clone();
    let state_for_categories = state.clone();
    let state_for_products = state.clone();
    let state_for_transactions = state.clone();
    let state_for_profile = state.clone();
    let state_for_tabs = state.clone();

    view! {
        <main class="page">
            <header class="topbar">
                <h1>"Админ-панель инвентаря"</h1>
                <Show when={
                    let state = state_for_header.clone();
                    move || state.is_authenticated()
                }>
                    <span class="who">
                        {
                            let state = state_for_header.clone();
                            move || {
                                state
                                    .user
                                    .get()
                                    .map(|user| user.full_name())
                                    .unwrap_or_default()
                            }
                        }
                    </span>
                    <button on:click=move |_| on_logout.run(())>"Выйти"</button>
                </Show>
            </header>

            <Show when=move || state_for_error_show.error.get().is_some()>
                <div class="banner error">{error_text.clone()}</div>
            </Show>
            <Show when=move || state_for_notice_show.notice.get().is_some()>
                <div class="banner notice">{notice_text.clone()}</div>
            </Show>

            <Show when=move || !state_for_auth_show.is_authenticated()>
                <AuthPanel state=state_for_auth.clone() />
            </Show>

            <Show when=move || state_for_panels_show.is_authenticated()>
                <nav class="tabs">
                    {tab_button(&state_for_tabs, Tab::Categories, "Категории")}
                    {tab_button(&state_for_tabs, Tab::Products, "Товары")}
                    {tab_button(&state_for_tabs, Tab::Transactions, "Транзакции")}
                    {tab_button(&state_for_tabs, Tab::Profile, "Профиль")}
                </nav>

                {
                    let categories_state = state_for_categories.clone();
                    let products_state = state_for_products.clone();
                    let transactions_state = state_for_transactions.clone();
                    let profile_state = state_for_profile.clone();
                    move || match categories_state.tab.get() {
                        Tab::Categories => {
                            view! { <CategoriesPanel state=categories_state.clone() /> }.into_any()
                        }
                        Tab::Products => {
                            view! { <ProductsPanel state=products_state.clone() /> }.into_any()
                        }
                        Tab::Transactions => {
                            view! { <TransactionsPanel state=transactions_state.clone() /> }
                                .into_any()
                        }
                        Tab::Profile => {
                            view! { <ProfilePanel state=profile_state.clone() /> }.into_any()
                        }
                    }
                }
            </Show>
        </main>
    }
}
