use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use panel_core::{Gender, SessionStore, UserUpdateInput, Validate, format_date};

use crate::api;
use crate::state::AppState;

#[component]
pub(crate) fn ProfilePanel(state: AppState) -> impl IntoView {
    let form_nama_depan = RwSignal::new(String::new());
    let form_nama_belakang = RwSignal::new(String::new());
    let form_email = RwSignal::new(String::new());
    let form_password = RwSignal::new(String::new());
    let form_confirmation = RwSignal::new(String::new());
    let form_tanggal_lahir = RwSignal::new(String::new());
    let form_jenis_kelamin = RwSignal::new(String::new());

    // форма заполняется текущим профилем один раз при открытии вкладки
    if let Some(user) = state.user.get_untracked() {
        form_nama_depan.set(user.nama_depan);
        form_nama_belakang.set(user.nama_belakang);
        form_email.set(user.email);
        form_tanggal_lahir.set(user.tanggal_lahir.unwrap_or_default());
        form_jenis_kelamin.set(
            user.jenis_kelamin
                .map(|g| g.as_str().to_string())
                .unwrap_or_default(),
        );
    }

    let on_submit = Callback::new({
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let Some(current) = state.user.get_untracked() else {
                state.set_error("Профиль недоступен без авторизации");
                return;
            };

            let optional = |signal: RwSignal<String>| {
                let value = signal.get().trim().to_string();
                (!value.is_empty()).then_some(value)
            };

            let jenis_kelamin = match optional(form_jenis_kelamin) {
                None => None,
                Some(raw) => match Gender::parse(&raw) {
                    Some(gender) => Some(gender),
                    None => {
                        state.set_error("Пол: ожидается Laki-laki или Perempuan");
                        return;
                    }
                },
            };

            let password = optional(form_password);
            let input = UserUpdateInput {
                nama_depan: optional(form_nama_depan),
                nama_belakang: optional(form_nama_belakang),
                email: optional(form_email),
                password_confirmation: password.as_ref().map(|_| form_confirmation.get()),
                password,
                tanggal_lahir: optional(form_tanggal_lahir),
                jenis_kelamin,
            };
            if input.validate().is_err() {
                state.set_error(
                    "Проверьте форму: пароль от 8 символов и совпадает с подтверждением",
                );
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::update_user(current.id, &input).await {
                    Ok(mutated) => {
                        state2.set_notice(mutated.message);
                        let session = SessionStore::global();
                        if let Err(err) = session.update_user(mutated.value.clone()) {
                            state2.set_error(err);
                        } else {
                            state2.user.set(Some(mutated.value));
                        }
                        form_password.set(String::new());
                        form_confirmation.set(String::new());
                    }
                    Err(err) => state2.set_error(err.user_message()),
                }
                state2.loading.set(false);
            });
        }
    });

    let state_for_view = state.clone();
    let created_text = {
        let state = state.clone();
        move || {
            state
                .user
                .get()
                .map(|user| format_date(&user.created_at))
                .unwrap_or_default()
        }
    };

    view! {
        <section class="profile">
            <h2>"Профиль"</h2>
            <p>"Зарегистрирован: " {created_text}</p>

            <form on:submit=move |ev| on_submit.run(ev)>
                <input
                    placeholder="имя"
                    prop:value=move || form_nama_depan.get()
                    on:input=move |ev| form_nama_depan.set(event_target_value(&ev))
                />
                <input
                    placeholder="фамилия"
                    prop:value=move || form_nama_belakang.get()
                    on:input=move |ev| form_nama_belakang.set(event_target_value(&ev))
                />
                <input
                    placeholder="email"
                    prop:value=move || form_email.get()
                    on:input=move |ev| form_email.set(event_target_value(&ev))
                />
                <input
                    placeholder="дата рождения (YYYY-MM-DD)"
                    prop:value=move || form_tanggal_lahir.get()
                    on:input=move |ev| form_tanggal_lahir.set(event_target_value(&ev))
                />
                <input
                    placeholder="пол (Laki-laki / Perempuan)"
                    prop:value=move || form_jenis_kelamin.get()
                    on:input=move |ev| form_jenis_kelamin.set(event_target_value(&ev))
                />
                <input
                    placeholder="новый пароль"
                    type="password"
                    prop:value=move || form_password.get()
                    on:input=move |ev| form_password.set(event_target_value(&ev))
                />
                <input
                    placeholder="подтверждение пароля"
                    type="password"
                    prop:value=move || form_confirmation.get()
                    on:input=move |ev| form_confirmation.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || state_for_view.loading.get()>
                    "Сохранить"
                </button>
            </form>
        </section>
    }
}
