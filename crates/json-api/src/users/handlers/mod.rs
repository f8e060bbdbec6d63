//! User Handlers

pub(crate) mod change_password;
pub(crate) mod delete;
pub(crate) mod deposit;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod profile;
pub(crate) mod refresh;
pub(crate) mod register;
pub(crate) mod register_admin;
pub(crate) mod transactions;
