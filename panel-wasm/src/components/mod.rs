pub(crate) mod auth_panel;
pub(crate) mod categories_panel;
pub(crate) mod data_table;
pub(crate) mod products_panel;
pub(crate) mod profile_panel;
pub(crate) mod transactions_panel;
