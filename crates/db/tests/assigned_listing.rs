//! Integration tests for the cross-project assignment listing.
//!
//! The listing joins each participant up to its client and supports
//! company, status and free-text filters plus limit/offset pagination.
//! The count query shares the filter so totals always match the page set.

use alianza_core::status::ParticipantStatus;
use sqlx::PgPool;
use alianza_db::models::client::{CreateClient, CreateClientArea};
use alianza_db::models::company::CreateCompany;
use alianza_db::models::participant::AssignedCompaniesFilter;
use alianza_db::models::project_request::CreateProjectRequest;
use alianza_db::models::requirement::CreateRequirement;
use alianza_db::repositories::{
    ClientAreaRepo, ClientRepo, CompanyRepo, ParticipantRepo, ProjectRequestRepo, RequirementRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_requirement(pool: &PgPool, client_name: &str, title: &str) -> (i64, i64) {
    let client = ClientRepo::create(
        pool,
        &CreateClient {
            name: client_name.to_string(),
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
            name: "General".to_string(),
            contact_name: None,
            contact_email: None,
        },
    )
    .await
    .unwrap();
    let request = ProjectRequestRepo::create(
        pool,
        &CreateProjectRequest {
            title: title.to_string(),
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
            name: format!("{title} works"),
            description: None,
        },
    )
    .await
    .unwrap();
    (client.id, requirement.id)
}

async fn company(pool: &PgPool, name: &str) -> i64 {
    CompanyRepo::create(
        pool,
        &CreateCompany {
            name: name.to_string(),
            legal_name: None,
            tax_id: None,
            email: None,
            phone: None,
            address: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn page(limit: i64, offset: i64) -> AssignedCompaniesFilter {
    AssignedCompaniesFilter {
        limit,
        offset,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: company filter scopes the listing and the total
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_company_filter_scopes_listing_and_total(pool: PgPool) {
    let (client_id, requirement_id) = seed_requirement(&pool, "Filtro Client", "Pipeline").await;
    let mine = company(&pool, "Mia SA").await;
    let other = company(&pool, "Otra SA").await;
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &[mine, other])
        .await
        .unwrap();

    let filter = AssignedCompaniesFilter {
        company_id: Some(mine),
        ..page(10, 0)
    };
    let rows = ParticipantRepo::list_assigned(&pool, &filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_id, mine);
    assert_eq!(rows[0].company, "Mia SA");
    assert_eq!(rows[0].client, "Filtro Client");

    let total = ParticipantRepo::count_assigned(&pool, &filter).await.unwrap();
    assert_eq!(total, 1, "count must honor the same filter as the page");
}

// ---------------------------------------------------------------------------
// Test: status filter matches the pipeline stage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_status_filter_matches_stage(pool: PgPool) {
    let (client_id, requirement_id) = seed_requirement(&pool, "Etapa Client", "Montaje").await;
    let moving = company(&pool, "Avanza SA").await;
    let staying = company(&pool, "Espera SA").await;
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &[moving, staying])
        .await
        .unwrap();

    let participants = ParticipantRepo::list_by_requirement(&pool, requirement_id)
        .await
        .unwrap();
    let moving_participant = participants.iter().find(|p| p.company_id == moving).unwrap();
    ParticipantRepo::update_status(
        &pool,
        moving_participant.id,
        ParticipantStatus::Selected.id(),
        ParticipantStatus::NdaPending.id(),
    )
    .await
    .unwrap();

    let filter = AssignedCompaniesFilter {
        status_id: Some(ParticipantStatus::NdaPending.id()),
        ..page(10, 0)
    };
    let rows = ParticipantRepo::list_assigned(&pool, &filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_id, moving);
    assert_eq!(rows[0].status_id, ParticipantStatus::NdaPending.id());
}

// ---------------------------------------------------------------------------
// Test: excluding the terminal stages hides finished engagements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_exclude_statuses_hides_terminal_stages(pool: PgPool) {
    let (client_id, requirement_id) = seed_requirement(&pool, "Activo Client", "Cierre").await;
    let finished = company(&pool, "Lista SA").await;
    let live = company(&pool, "Activa SA").await;
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &[finished, live])
        .await
        .unwrap();

    let participants = ParticipantRepo::list_by_requirement(&pool, requirement_id)
        .await
        .unwrap();
    let target = participants.iter().find(|p| p.company_id == finished).unwrap();

    // Walk the pipeline to a terminal stage one guarded move at a time.
    use ParticipantStatus::*;
    let path = [Selected, NdaPending, NdaSigned, DocsRequested, DocsReceived, ProposalSent];
    for pair in path.windows(2) {
        let moved = ParticipantRepo::update_status(&pool, target.id, pair[0].id(), pair[1].id())
            .await
            .unwrap();
        assert!(moved, "guarded move {:?} -> {:?} should apply", pair[0], pair[1]);
    }
    ParticipantRepo::update_status(&pool, target.id, ProposalSent.id(), ProposalRejected.id())
        .await
        .unwrap();

    let filter = AssignedCompaniesFilter {
        exclude_statuses: Some(ParticipantStatus::TERMINAL_IDS.to_vec()),
        ..page(10, 0)
    };
    let rows = ParticipantRepo::list_assigned(&pool, &filter).await.unwrap();
    assert_eq!(rows.len(), 1, "only the live engagement should remain");
    assert_eq!(rows[0].company_id, live);

    let total = ParticipantRepo::count_assigned(&pool, &filter).await.unwrap();
    assert_eq!(total, 1);

    let everything = ParticipantRepo::count_assigned(&pool, &page(10, 0)).await.unwrap();
    assert_eq!(everything, 2, "without the filter both rows stay visible");
}

// ---------------------------------------------------------------------------
// Test: free-text search spans company, requirement and title
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_spans_display_fields(pool: PgPool) {
    let (client_id, requirement_id) =
        seed_requirement(&pool, "Texto Client", "Calderas").await;
    let hit = company(&pool, "Termica SA").await;
    let miss = company(&pool, "Fria SA").await;
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &[hit, miss])
        .await
        .unwrap();

    // Matches the company name, case-insensitively.
    let by_company = AssignedCompaniesFilter {
        search: Some("termica".to_string()),
        ..page(10, 0)
    };
    let rows = ParticipantRepo::list_assigned(&pool, &by_company).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_id, hit);

    // Matches the request title, which both participants share.
    let by_title = AssignedCompaniesFilter {
        search: Some("calderas".to_string()),
        ..page(10, 0)
    };
    let rows = ParticipantRepo::list_assigned(&pool, &by_title).await.unwrap();
    assert_eq!(rows.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: limit and offset walk the full set without overlap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_pagination_walks_without_overlap(pool: PgPool) {
    let (client_id, requirement_id) = seed_requirement(&pool, "Pagina Client", "Obra").await;
    let mut ids = Vec::new();
    for index in 0..5 {
        ids.push(company(&pool, &format!("Empresa {index} SA")).await);
    }
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &ids)
        .await
        .unwrap();

    let total = ParticipantRepo::count_assigned(&pool, &page(2, 0)).await.unwrap();
    assert_eq!(total, 5);

    let mut seen = Vec::new();
    for offset in [0, 2, 4] {
        let rows = ParticipantRepo::list_assigned(&pool, &page(2, offset))
            .await
            .unwrap();
        for row in rows {
            assert!(
                !seen.contains(&row.id),
                "pages must not repeat participants"
            );
            seen.push(row.id);
        }
    }
    assert_eq!(seen.len(), 5, "walking all pages should cover the whole set");
}

// ---------------------------------------------------------------------------
// Test: deleting the request hides its assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_request_hides_assignments(pool: PgPool) {
    let (client_id, requirement_id) = seed_requirement(&pool, "Cancela Client", "Descarte").await;
    let (other_client, other_requirement) =
        seed_requirement(&pool, "Vigente Client", "Continua").await;
    let doomed = company(&pool, "Perdida SA").await;
    let surviving = company(&pool, "Vigente SA").await;
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &[doomed])
        .await
        .unwrap();
    ParticipantRepo::sync_selection(&pool, other_requirement, other_client, &[surviving])
        .await
        .unwrap();

    let requirement = RequirementRepo::find_by_id(&pool, requirement_id)
        .await
        .unwrap()
        .unwrap();
    ProjectRequestRepo::soft_delete(&pool, requirement.project_request_id)
        .await
        .unwrap();

    let rows = ParticipantRepo::list_assigned(&pool, &page(10, 0)).await.unwrap();
    assert_eq!(rows.len(), 1, "assignments under a deleted request must drop out");
    assert_eq!(rows[0].company_id, surviving);

    let total = ParticipantRepo::count_assigned(&pool, &page(10, 0)).await.unwrap();
    assert_eq!(total, 1);
}

// ---------------------------------------------------------------------------
// Test: soft-deleted participants drop out of the listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_removed_participants_drop_out(pool: PgPool) {
    let (client_id, requirement_id) = seed_requirement(&pool, "Baja Client", "Tuberia").await;
    let kept = company(&pool, "Sigue SA").await;
    let removed = company(&pool, "Baja SA").await;
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &[kept, removed])
        .await
        .unwrap();
    ParticipantRepo::sync_selection(&pool, requirement_id, client_id, &[kept])
        .await
        .unwrap();

    let rows = ParticipantRepo::list_assigned(&pool, &page(10, 0)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_id, kept);

    let total = ParticipantRepo::count_assigned(&pool, &page(10, 0)).await.unwrap();
    assert_eq!(total, 1);
}
