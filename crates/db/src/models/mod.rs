//! Row models and DTOs.
//!
//! Each submodule pairs a `FromRow` + `Serialize` entity struct with the
//! `Deserialize` DTOs used to create and patch it. Query-shaped rows (joined
//! listings, counters) live next to the entity they describe.

pub mod certification;
pub mod client;
pub mod company;
pub mod message;
pub mod nda;
pub mod participant;
pub mod project_request;
pub mod quotation;
pub mod requirement;
pub mod role;
pub mod session;
pub mod specialty;
pub mod user;
