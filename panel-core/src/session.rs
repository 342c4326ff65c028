use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use serde::{Deserialize, Serialize};

use crate::models::User;

/// Ключ записи сессии в долговременном хранилище.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Имя cookie с дубликатом токена для серверного роут-гарда.
pub const AUTH_COOKIE_NAME: &str = "auth-token";

#[derive(Debug, Clone, Default)]
/// Снимок текущей сессии.
pub struct SessionSnapshot {
    /// Авторизованный пользователь.
    pub user: Option<User>,
    /// Bearer-токен.
    pub token: Option<String>,
    /// Считается ли сессия авторизованной.
    pub authenticated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Запись сессии, которая переживает перезапуск клиента.
pub struct PersistedSession {
    /// Пользователь на момент входа.
    pub user: Option<User>,
    /// Bearer-токен.
    pub token: String,
    /// Флаг авторизованности.
    pub authenticated: bool,
}

/// Долговременное хранилище сессии: localStorage, файл или память.
pub trait SessionStorage: Send + Sync {
    /// Читает сохранённую сессию, если она есть и разбирается.
    fn load(&self) -> Option<PersistedSession>;
    /// Сохраняет сессию.
    fn save(&self, session: &PersistedSession) -> Result<(), String>;
    /// Удаляет сохранённую сессию.
    fn clear(&self) -> Result<(), String>;
}

/// Дубликат токена для серверного роут-гарда (cookie `auth-token`).
///
/// Хранилище и cookie — два представления одного токена; стор обязан
/// держать их синхронными на каждом входе, выходе и сбросе по 401.
pub trait TokenMirror: Send + Sync {
    /// Записывает токен.
    fn set(&self, token: &str) -> Result<(), String>;
    /// Стирает токен.
    fn clear(&self) -> Result<(), String>;
}

#[derive(Debug, Default)]
/// Хранилище сессии в памяти: вариант по умолчанию и для тестов.
pub struct MemorySessionStorage {
    slot: Mutex<Option<PersistedSession>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Option<PersistedSession> {
        self.slot.lock().expect("session slot poisoned").clone()
    }

    fn save(&self, session: &PersistedSession) -> Result<(), String> {
        *self.slot.lock().expect("session slot poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        *self.slot.lock().expect("session slot poisoned") = None;
        Ok(())
    }
}

type ExpiryHook = Box<dyn Fn() + Send + Sync>;

/// Сессия авторизации: единственный общий мутабельный ресурс клиента.
///
/// Все изменения идут через `login`/`logout`/`handle_unauthorized`;
/// прямых записей извне нет, чтение — через узкие аксессоры. На процесс
/// существует один глобальный экземпляр, создаваемый лениво.
pub struct SessionStore {
    state: RwLock<SessionSnapshot>,
    storage: Box<dyn SessionStorage>,
    mirror: Option<Box<dyn TokenMirror>>,
    on_expired: RwLock<Option<ExpiryHook>>,
}

static GLOBAL_SESSION: OnceLock<Arc<SessionStore>> = OnceLock::new();

impl SessionStore {
    /// Создаёт стор поверх хранилища и восстанавливает сохранённую сессию.
    ///
    /// Запись с пустым токеном или без флага авторизации игнорируется.
    pub fn new(storage: Box<dyn SessionStorage>, mirror: Option<Box<dyn TokenMirror>>) -> Self {
        let state = match storage.load() {
            Some(saved) if saved.authenticated && !saved.token.trim().is_empty() => {
                SessionSnapshot {
                    user: saved.user,
                    token: Some(saved.token),
                    authenticated: true,
                }
            }
            _ => SessionSnapshot::default(),
        };
        Self {
            state: RwLock::new(state),
            storage,
            mirror,
            on_expired: RwLock::new(None),
        }
    }

    /// Устанавливает процесс-глобальный экземпляр.
    ///
    /// Живёт первый установленный: повторные вызовы возвращают его же.
    pub fn install(store: SessionStore) -> Arc<SessionStore> {
        GLOBAL_SESSION.get_or_init(|| Arc::new(store)).clone()
    }

    /// Глобальный экземпляр; если `install` не вызывали, лениво
    /// создаётся поверх памяти.
    pub fn global() -> Arc<SessionStore> {
        GLOBAL_SESSION
            .get_or_init(|| {
                Arc::new(SessionStore::new(
                    Box::new(MemorySessionStorage::default()),
                    None,
                ))
            })
            .clone()
    }

    /// Колбэк принудительного разлогина по 401 (редирект на вход).
    pub fn set_expiry_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_expired.write().expect("expiry hook lock poisoned") = Some(Box::new(hook));
    }

    /// Текущий снимок сессии.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().expect("session state poisoned").clone()
    }

    /// Токен для заголовка `Authorization`.
    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .expect("session state poisoned")
            .token
            .clone()
    }

    /// Авторизован ли пользователь.
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("session state poisoned")
            .authenticated
    }

    /// Вход: записывает пользователя и токен во все представления
    /// (состояние, долговременное хранилище, cookie роут-гарда).
    pub fn login(&self, user: User, token: String) -> Result<(), String> {
        {
            let mut state = self.state.write().expect("session state poisoned");
            state.user = Some(user.clone());
            state.token = Some(token.clone());
            state.authenticated = true;
        }
        self.storage.save(&PersistedSession {
            user: Some(user),
            token: token.clone(),
            authenticated: true,
        })?;
        if let Some(mirror) = &self.mirror {
            mirror.set(&token)?;
        }
        Ok(())
    }

    /// Обновляет пользователя в сессии (после правки профиля),
    /// не трогая токен.
    pub fn update_user(&self, user: User) -> Result<(), String> {
        let token = {
            let mut state = self.state.write().expect("session state poisoned");
            if !state.authenticated {
                return Err("сессия не авторизована".to_string());
            }
            state.user = Some(user.clone());
            state.token.clone().unwrap_or_default()
        };
        self.storage.save(&PersistedSession {
            user: Some(user),
            token,
            authenticated: true,
        })
    }

    /// Выход: чистит состояние, хранилище и cookie роут-гарда.
    pub fn logout(&self) -> Result<(), String> {
        self.clear_everywhere()
    }

    /// Реакция на 401: ведёт себя как явный выход, после чего дёргает
    /// колбэк редиректа на вход.
    pub fn handle_unauthorized(&self) {
        tracing::warn!(target: "panel::session", "получен 401: сессия сбрасывается");
        if let Err(err) = self.clear_everywhere() {
            tracing::warn!(target: "panel::session", "не удалось очистить сессию: {err}");
        }
        if let Some(hook) = self
            .on_expired
            .read()
            .expect("expiry hook lock poisoned")
            .as_ref()
        {
            hook();
        }
    }

    fn clear_everywhere(&self) -> Result<(), String> {
        {
            let mut state = self.state.write().expect("session state poisoned");
            *state = SessionSnapshot::default();
        }
        self.storage.clear()?;
        if let Some(mirror) = &self.mirror {
            mirror.clear()?;
        }
        Ok(())
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
