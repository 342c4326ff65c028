use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use panel_core::{LoginInput, RegisterInput, SessionStore, Validate};

use crate::api;
use crate::state::AppState;

#[component]
pub(crate) fn AuthPanel(state: AppState) -> impl IntoView {
    let login_email = RwSignal::new(String::new());
    let login_password = RwSignal::new(String::new());

    let show_register = RwSignal::new(false);
    let reg_nama_depan = RwSignal::new(String::new());
    let reg_nama_belakang = RwSignal::new(String::new());
    let reg_email = RwSignal::new(String::new());
    let reg_password = RwSignal::new(String::new());
    let reg_confirmation = RwSignal::new(String::new());

    let on_login = {
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let input = LoginInput {
                email: login_email.get().trim().to_string(),
                password: login_password.get(),
            };
            if input.validate().is_err() {
                state.set_error("Проверьте email и пароль (минимум 6 символов)");
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::login(&input).await {
                    Ok(payload) => {
                        let session = SessionStore::global();
                        match session.login(payload.user.clone(), payload.access_token) {
                            Ok(()) => {
                                state2.user.set(Some(payload.user));
                                state2.clear_error();
                            }
                            Err(err) => state2.set_error(err),
                        }
                    }
                    Err(err) => state2.set_error(err.user_message()),
                }
                state2.loading.set(false);
            });
        }
    };

    let on_register = Callback::new({
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let input = RegisterInput {
                nama_depan: reg_nama_depan.get().trim().to_string(),
                nama_belakang: reg_nama_belakang.get().trim().to_string(),
                email: reg_email.get().trim().to_string(),
                password: reg_password.get(),
                password_confirmation: reg_confirmation.get(),
                tanggal_lahir: None,
                jenis_kelamin: None,
            };
            if input.validate().is_err() {
                state.set_error(
                    "Проверьте форму: имена от 2 символов, пароль от 6 и совпадает с подтверждением",
                );
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::register(&input).await {
                    Ok(payload) => {
                        let session = SessionStore::global();
                        match session.login(payload.user.clone(), payload.access_token) {
                            Ok(()) => {
                                state2.user.set(Some(payload.user));
                                state2.clear_error();
                            }
                            Err(err) => state2.set_error(err),
                        }
                    }
                    Err(err) => state2.set_error(err.user_message()),
                }
                state2.loading.set(false);
            });
        }
    });

    let state_for_view = state.clone();

    view! {
        <section class="auth">
            <h2>"Вход"</h2>
            <form on:submit=on_login>
                <input
                    placeholder="email"
                    prop:value=move || login_email.get()
                    on:input=move |ev| login_email.set(event_target_value(&ev))
                />
                <input
                    placeholder="пароль"
                    type="password"
                    prop:value=move || login_password.get()
                    on:input=move |ev| login_password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || state_for_view.loading.get()>
                    "Войти"
                </button>
            </form>

            <button class="link" on:click=move |_| show_register.update(|v| *v = !*v)>
                "Нет аккаунта? Регистрация"
            </button>

            <Show when=move || show_register.get()>
                <h2>"Регистрация"</h2>
                <form on:submit=move |ev| on_register.run(ev)>
                    <input
                        placeholder="имя"
                        on:input=move |ev| reg_nama_depan.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="фамилия"
                        on:input=move |ev| reg_nama_belakang.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="email"
                        on:input=move |ev| reg_email.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="пароль"
                        type="password"
                        on:input=move |ev| reg_password.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="подтверждение пароля"
                        type="password"
                        on:input=move |ev| reg_confirmation.set(event_target_value(&ev))
                    />
                    <button type="submit" disabled=move || state.loading.get()>
                        "Зарегистрироваться"
                    </button>
                </form>
            </Show>
        </section>
    }
}
