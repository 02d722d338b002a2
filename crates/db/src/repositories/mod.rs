//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept `&PgPool` as the first argument. Reads exclude soft-deleted rows
//! unless a method says otherwise.

pub mod certification_repo;
pub mod client_repo;
pub mod company_repo;
pub mod message_repo;
pub mod nda_repo;
pub mod participant_repo;
pub mod project_request_repo;
pub mod quotation_repo;
pub mod requirement_repo;
pub mod role_repo;
pub mod session_repo;
pub mod specialty_repo;
pub mod user_repo;

pub use certification_repo::CertificationRepo;
pub use client_repo::{ClientAreaRepo, ClientRepo};
pub use company_repo::CompanyRepo;
pub use message_repo::MessageRepo;
pub use nda_repo::NdaRepo;
pub use participant_repo::ParticipantRepo;
pub use project_request_repo::ProjectRequestRepo;
pub use quotation_repo::QuotationRepo;
pub use requirement_repo::RequirementRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use specialty_repo::SpecialtyRepo;
pub use user_repo::UserRepo;
