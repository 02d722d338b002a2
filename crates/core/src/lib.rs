//! Core domain logic for the alianza associate-network platform.
//!
//! Pure types and rules shared by the persistence and API layers: the
//! error taxonomy, role names, the participant lifecycle state machine,
//! NDA validity rules, quotation arithmetic, and pagination clamps.
//! This crate has no internal dependencies so the business rules can be
//! tested in isolation from the database and the HTTP stack.

pub mod error;
pub mod nda;
pub mod pagination;
pub mod quotation;
pub mod roles;
pub mod status;
pub mod types;
