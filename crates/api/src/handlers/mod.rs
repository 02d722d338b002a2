//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `alianza_db`, run domain rules
//! from `alianza_core`, and map failures via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod admin_users;
pub mod assigned;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod companies;
pub mod messages;
pub mod ndas;
pub mod participants;
pub mod project_requests;
pub mod quotations;
pub mod requirements;
