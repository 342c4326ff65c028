use std::sync::Arc;

use wasm_bindgen::JsCast;

use panel_core::{
    AUTH_COOKIE_NAME, PersistedSession, SESSION_STORAGE_KEY, SessionStorage, SessionStore,
    TokenMirror,
};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn html_document() -> Option<web_sys::HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
}

fn parse_session(raw: &str) -> Option<PersistedSession> {
    serde_json::from_str(raw).ok()
}

/// Сессия в localStorage под фиксированным ключом.
pub(crate) struct LocalSessionStorage;

impl SessionStorage for LocalSessionStorage {
    fn load(&self) -> Option<PersistedSession> {
        let raw = local_storage()?.get_item(SESSION_STORAGE_KEY).ok()??;
        parse_session(&raw)
    }

    fn save(&self, session: &PersistedSession) -> Result<(), String> {
        let storage = local_storage().ok_or_else(|| "localStorage недоступен".to_string())?;
        let raw = serde_json::to_string(session)
            .map_err(|_| "не удалось сериализовать сессию".to_string())?;
        storage
            .set_item(SESSION_STORAGE_KEY, &raw)
            .map_err(|_| "не удалось сохранить сессию".to_string())
    }

    fn clear(&self) -> Result<(), String> {
        let storage = local_storage().ok_or_else(|| "localStorage недоступен".to_string())?;
        storage
            .remove_item(SESSION_STORAGE_KEY)
            .map_err(|_| "не удалось очистить сессию".to_string())
    }
}

/// Cookie с дубликатом токена, которую читает серверный роут-гард.
pub(crate) struct AuthCookieMirror;

impl TokenMirror for AuthCookieMirror {
    fn set(&self, token: &str) -> Result<(), String> {
        let document = html_document().ok_or_else(|| "document недоступен".to_string())?;
        document
            .set_cookie(&format!(
                "{AUTH_COOKIE_NAME}={token}; path=/; max-age=86400; samesite=strict"
            ))
            .map_err(|_| "не удалось записать cookie".to_string())
    }

    fn clear(&self) -> Result<(), String> {
        let document = html_document().ok_or_else(|| "document недоступен".to_string())?;
        document
            .set_cookie(&format!(
                "{AUTH_COOKIE_NAME}=; path=/; expires=Thu, 01 Jan 1970 00:00:01 GMT"
            ))
            .map_err(|_| "не удалось очистить cookie".to_string())
    }
}

/// Ставит глобальную сессию поверх браузерных хранилищ.
pub(crate) fn install_session() -> Arc<SessionStore> {
    SessionStore::install(SessionStore::new(
        Box::new(LocalSessionStorage),
        Some(Box::new(AuthCookieMirror)),
    ))
}

/// Редирект на точку входа после сброса сессии.
pub(crate) fn redirect_to_login() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href("/");
    }
}
