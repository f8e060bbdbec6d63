//! Authentication

mod errors;
mod models;
mod password;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use password::*;
pub(crate) use password::check_password_strength;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
