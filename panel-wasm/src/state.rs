use leptos::prelude::*;

use panel_core::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Активная вкладка панели.
pub(crate) enum Tab {
    Categories,
    Products,
    Transactions,
    Profile,
}

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) user: RwSignal<Option<User>>,
    pub(crate) tab: RwSignal<Tab>,
    pub(crate) error: RwSignal<Option<String>>,
    pub(crate) notice: RwSignal<Option<String>>,
    pub(crate) loading: RwSignal<bool>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            user: RwSignal::new(None),
            tab: RwSignal::new(Tab::Categories),
            error: RwSignal::new(None),
            notice: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.notice.set(None);
        self.error.set(Some(message.into()));
    }

    pub(crate) fn clear_error(&self) {
        self.error.set(None);
    }

    pub(crate) fn set_notice(&self, message: impl Into<String>) {
        self.error.set(None);
        self.notice.set(Some(message.into()));
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.user.get().is_some()
    }
}
