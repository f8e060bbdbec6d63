//! Users, sessions and balances

mod errors;
mod handlers;

pub(crate) use handlers::*;
