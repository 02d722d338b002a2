//! Integration tests for quotation collection and the client summary.
//!
//! Participants submit one quotation each; resubmitting replaces costs and
//! segments in place. Staff then build a client-facing summary: the chosen
//! quotations get flagged, the summary row is upserted, and an Open request
//! moves to QuotationGenerated.

use alianza_core::status::ProjectRequestStatus;
use sqlx::PgPool;
use alianza_db::models::client::{CreateClient, CreateClientArea};
use alianza_db::models::company::CreateCompany;
use alianza_db::models::project_request::CreateProjectRequest;
use alianza_db::models::quotation::{QuotationInput, SaveClientSummary, SegmentInput};
use alianza_db::models::requirement::CreateRequirement;
use alianza_db::repositories::{
    ClientAreaRepo, ClientRepo, CompanyRepo, ParticipantRepo, ProjectRequestRepo, QuotationRepo,
    RequirementRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Seed a request with one requirement and `companies` assigned participants.
/// Returns (request_id, participant_ids).
async fn seed_participants(pool: &PgPool, companies: &[&str]) -> (i64, Vec<i64>) {
    let client = ClientRepo::create(
        pool,
        &CreateClient {
            name: "Quote Client".to_string(),
            tax_id: None,
            email: None,
            phone: None,
        },
    )
    .await
    .unwrap();
    let area = ClientAreaRepo::create(
        pool,
        client.id,
        &CreateClientArea {
            name: "Plant".to_string(),
            contact_name: None,
            contact_email: None,
        },
    )
    .await
    .unwrap();
    let request = ProjectRequestRepo::create(
        pool,
        &CreateProjectRequest {
            title: "Boiler overhaul".to_string(),
            client_area_id: area.id,
            observations: None,
        },
    )
    .await
    .unwrap();
    let requirement = RequirementRepo::create(
        pool,
        request.id,
        &CreateRequirement {
            name: "Mechanical works".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let mut company_ids = Vec::with_capacity(companies.len());
    for name in companies {
        let company = CompanyRepo::create(
            pool,
            &CreateCompany {
                name: (*name).to_string(),
                legal_name: None,
                tax_id: None,
                email: None,
                phone: None,
                address: None,
            },
        )
        .await
        .unwrap();
        company_ids.push(company.id);
    }
    ParticipantRepo::sync_selection(pool, requirement.id, client.id, &company_ids)
        .await
        .unwrap();

    let participants = ParticipantRepo::list_by_requirement(pool, requirement.id)
        .await
        .unwrap();
    let participant_ids = company_ids
        .iter()
        .map(|cid| {
            participants
                .iter()
                .find(|p| p.company_id == *cid)
                .unwrap()
                .id
        })
        .collect();
    (request.id, participant_ids)
}

fn quote(price_cents: i64, segments: Vec<SegmentInput>) -> QuotationInput {
    QuotationInput {
        material_cost_cents: price_cents / 2,
        direct_cost_cents: price_cents / 4,
        indirect_cost_cents: price_cents / 4,
        price_cents,
        notes: None,
        segments,
    }
}

fn segment(description: &str, delivery_days: i32, amount_cents: i64) -> SegmentInput {
    SegmentInput {
        description: description.to_string(),
        delivery_days,
        amount_cents,
    }
}

// ---------------------------------------------------------------------------
// Test: first submission creates quotation and segments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_creates_quotation_with_segments(pool: PgPool) {
    let (_, participants) = seed_participants(&pool, &["Mecanica SA"]).await;

    let saved = QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(
            1_000_000,
            vec![
                segment("Disassembly", 10, 400_000),
                segment("Reassembly", 15, 600_000),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(saved.quotation.price_cents, 1_000_000);
    assert!(!saved.quotation.is_client_selected);
    assert!(!saved.quotation.is_client_approved);
    assert_eq!(saved.segments.len(), 2);
    assert_eq!(saved.segments[0].position, 1);
    assert_eq!(saved.segments[0].description, "Disassembly");
    assert_eq!(saved.segments[1].position, 2);
}

// ---------------------------------------------------------------------------
// Test: resubmission replaces costs and segments in place
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reupsert_replaces_costs_and_segments(pool: PgPool) {
    let (_, participants) = seed_participants(&pool, &["Revisada SA"]).await;

    let first = QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(
            900_000,
            vec![segment("Old scope", 20, 900_000)],
        ),
    )
    .await
    .unwrap();

    let second = QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(
            750_000,
            vec![
                segment("Phase one", 7, 250_000),
                segment("Phase two", 14, 500_000),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(
        second.quotation.id, first.quotation.id,
        "resubmitting must update the same quotation row"
    );
    assert_eq!(second.quotation.price_cents, 750_000);

    let segments = QuotationRepo::segments_for(&pool, first.quotation.id)
        .await
        .unwrap();
    assert_eq!(segments.len(), 2, "old segments should be gone");
    assert!(
        segments.iter().all(|s| s.description != "Old scope"),
        "replaced segments must not survive"
    );
}

// ---------------------------------------------------------------------------
// Test: resubmission does not clear the client's selection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reupsert_preserves_client_selection(pool: PgPool) {
    let (request_id, participants) = seed_participants(&pool, &["Elegida SA"]).await;

    let saved = QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(500_000, vec![segment("Works", 30, 500_000)]),
    )
    .await
    .unwrap();
    QuotationRepo::save_client_summary(
        &pool,
        request_id,
        &SaveClientSummary {
            quotation_ids: vec![saved.quotation.id],
            price_cents: 550_000,
            observations: None,
            file_name: None,
            file_data: None,
        },
    )
    .await
    .unwrap();

    // The associate revises the costs afterwards.
    QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(480_000, vec![segment("Works", 28, 480_000)]),
    )
    .await
    .unwrap();

    let current = QuotationRepo::find_by_participant(&pool, participants[0])
        .await
        .unwrap()
        .unwrap();
    assert!(
        current.quotation.is_client_selected,
        "revising costs must not drop the client's selection"
    );
    assert_eq!(current.quotation.price_cents, 480_000);
}

// ---------------------------------------------------------------------------
// Test: saving the summary flags quotations and pushes the request
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_save_summary_flags_and_pushes_status(pool: PgPool) {
    let (request_id, participants) =
        seed_participants(&pool, &["Ganadora SA", "Perdedora SA"]).await;

    let winner = QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(800_000, vec![segment("Full scope", 45, 800_000)]),
    )
    .await
    .unwrap();
    let loser = QuotationRepo::upsert_for_participant(
        &pool,
        participants[1],
        &quote(950_000, vec![segment("Full scope", 60, 950_000)]),
    )
    .await
    .unwrap();

    let summary = QuotationRepo::save_client_summary(
        &pool,
        request_id,
        &SaveClientSummary {
            quotation_ids: vec![winner.quotation.id],
            price_cents: 880_000,
            observations: Some("Margin included".to_string()),
            file_name: Some("summary.pdf".to_string()),
            file_data: Some(b"%PDF-1.4 summary".to_vec()),
        },
    )
    .await
    .unwrap();
    assert_eq!(summary.project_request_id, request_id);
    assert_eq!(summary.price_cents, 880_000);

    let rows = QuotationRepo::list_for_request(&pool, request_id).await.unwrap();
    let flagged = |id: i64| rows.iter().find(|r| r.id == id).unwrap().is_client_selected;
    assert!(flagged(winner.quotation.id), "chosen quotation should be flagged");
    assert!(!flagged(loser.quotation.id), "the rest should stay unflagged");

    let request = ProjectRequestRepo::find_by_id(&pool, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        request.status_id,
        ProjectRequestStatus::QuotationGenerated.id(),
        "saving a summary should move an Open request forward"
    );
}

// ---------------------------------------------------------------------------
// Test: re-saving updates the summary in place and keeps the file
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_resave_summary_updates_in_place_and_keeps_file(pool: PgPool) {
    let (request_id, participants) = seed_participants(&pool, &["Unica SA"]).await;
    let saved = QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(600_000, vec![segment("Scope", 30, 600_000)]),
    )
    .await
    .unwrap();

    let first = QuotationRepo::save_client_summary(
        &pool,
        request_id,
        &SaveClientSummary {
            quotation_ids: vec![saved.quotation.id],
            price_cents: 660_000,
            observations: None,
            file_name: Some("summary-v1.pdf".to_string()),
            file_data: Some(b"%PDF-1.4 v1".to_vec()),
        },
    )
    .await
    .unwrap();

    // Second save adjusts the price but uploads no new document.
    let second = QuotationRepo::save_client_summary(
        &pool,
        request_id,
        &SaveClientSummary {
            quotation_ids: vec![saved.quotation.id],
            price_cents: 640_000,
            observations: Some("Renegotiated".to_string()),
            file_name: None,
            file_data: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(second.id, first.id, "one summary row per request");
    assert_eq!(second.price_cents, 640_000);
    assert_eq!(
        second.file_name.as_deref(),
        Some("summary-v1.pdf"),
        "a save without an upload keeps the stored document"
    );

    let file = QuotationRepo::fetch_summary_file(&pool, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(file.file_data, b"%PDF-1.4 v1");
}

// ---------------------------------------------------------------------------
// Test: the summary never drags a finished request backwards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_save_summary_never_downgrades_finished_request(pool: PgPool) {
    let (request_id, participants) = seed_participants(&pool, &["Tardia SA"]).await;
    let saved = QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(300_000, vec![segment("Scope", 10, 300_000)]),
    )
    .await
    .unwrap();

    let moved = ProjectRequestRepo::set_status(
        &pool,
        request_id,
        ProjectRequestStatus::Open.id(),
        ProjectRequestStatus::Finished.id(),
    )
    .await
    .unwrap();
    assert!(moved);

    QuotationRepo::save_client_summary(
        &pool,
        request_id,
        &SaveClientSummary {
            quotation_ids: vec![saved.quotation.id],
            price_cents: 330_000,
            observations: None,
            file_name: None,
            file_data: None,
        },
    )
    .await
    .unwrap();

    let request = ProjectRequestRepo::find_by_id(&pool, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        request.status_id,
        ProjectRequestStatus::Finished.id(),
        "only Open requests move to QuotationGenerated"
    );
}

// ---------------------------------------------------------------------------
// Test: request listing joins company and requirement names
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_for_request_joins_display_names(pool: PgPool) {
    let (request_id, participants) = seed_participants(&pool, &["Visible SA"]).await;
    QuotationRepo::upsert_for_participant(
        &pool,
        participants[0],
        &quote(450_000, vec![segment("Scope", 21, 450_000)]),
    )
    .await
    .unwrap();

    let rows = QuotationRepo::list_for_request(&pool, request_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "Visible SA");
    assert_eq!(rows[0].requirement, "Mechanical works");
    assert_eq!(rows[0].participant_id, participants[0]);
}
