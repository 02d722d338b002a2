//! Role and company scoping tests: which surfaces reject associates, how
//! associates are pinned to their own company's records, and the per-request
//! conversation with its unread counters.

mod common;

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::Router;
use common::{
    auth_token, body_json, build_test_app, delete_auth, get_auth, post_auth, post_json_auth,
    post_multipart_auth, put_json_auth, Part,
};
use sqlx::PgPool;

use alianza_api::auth::password::hash_password;
use alianza_db::models::user::CreateUser;
use alianza_db::repositories::UserRepo;

const NDA_BYTES: &[u8] = b"%PDF-1.4 nda document";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str, role_id: i64, company_id: Option<i64>) -> String {
    let hashed = hash_password("seed_password_123!").unwrap();
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            role_id,
            company_id,
        },
    )
    .await
    .unwrap();
    auth_token(user.id)
}

/// Client, area, project request and one requirement. Names are parameterized
/// so one test can hold several requests.
async fn seed_request(app: &Router, token: &str, client: &str, title: &str) -> (i64, i64) {
    let body = serde_json::json!({ "name": client });
    let response = post_json_auth(app.clone(), "/api/v1/clients", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let client_id = body_json(response).await["id"].as_i64().unwrap();

    let body = serde_json::json!({ "name": "Mantenimiento" });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/clients/{client_id}/areas"),
        token,
        body,
    )
    .await;
    let area_id = body_json(response).await["id"].as_i64().unwrap();

    let body = serde_json::json!({ "title": title, "client_area_id": area_id });
    let response = post_json_auth(app.clone(), "/api/v1/project_requests", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let request_id = body_json(response).await["id"].as_i64().unwrap();

    let requirement_id = create_requirement(app, token, request_id, "Cambio de revestimientos").await;
    (request_id, requirement_id)
}

async fn create_requirement(app: &Router, token: &str, request_id: i64, name: &str) -> i64 {
    let body = serde_json::json!({ "name": name });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{request_id}/requirements"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_company(app: &Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({ "name": name });
    let response = post_json_auth(app.clone(), "/api/v1/companies", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn sync_companies(
    app: &Router,
    token: &str,
    request_id: i64,
    requirement_id: i64,
    ids: &[i64],
) {
    let payload = serde_json::to_vec(ids).unwrap();
    let parts = [Part {
        name: "selectedCompanies",
        file_name: None,
        data: &payload,
    }];
    let response = post_multipart_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{request_id}/requirements/{requirement_id}/participants"),
        token,
        &parts,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Participant id of `company_id` on the requirement.
async fn participant_of(
    app: &Router,
    token: &str,
    request_id: i64,
    requirement_id: i64,
    company_id: i64,
) -> i64 {
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{request_id}/requirements/{requirement_id}/participants"),
        token,
    )
    .await;
    let rows = body_json(response).await;
    rows.as_array()
        .unwrap()
        .iter()
        .find(|r| r["company_id"] == company_id)
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}

async fn set_status(
    app: &Router,
    token: &str,
    participant_id: i64,
    status_id: i64,
) -> Response<Body> {
    let body = serde_json::json!({ "status_id": status_id });
    put_json_auth(
        app.clone(),
        &format!("/api/v1/participants/{participant_id}/status"),
        token,
        body,
    )
    .await
}

async fn upload_nda(app: &Router, token: &str, participant_id: i64) {
    let parts = [
        Part { name: "file", file_name: Some("nda.pdf"), data: NDA_BYTES },
        Part { name: "expires_at", file_name: None, data: b"2030-12-31" },
    ];
    let response = post_multipart_auth(
        app.clone(),
        &format!("/api/v1/participants/{participant_id}/nda"),
        token,
        &parts,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

fn quotation_body(price_cents: i64) -> serde_json::Value {
    serde_json::json!({
        "material_cost_cents": 40_000,
        "direct_cost_cents": 25_000,
        "indirect_cost_cents": 10_000,
        "price_cents": price_cents,
        "segments": [
            { "description": "Entrega unica", "delivery_days": 30, "amount_cents": price_cents },
        ],
    })
}

// ---------------------------------------------------------------------------
// Staff-only surfaces
// ---------------------------------------------------------------------------

/// Workflow management stays staff-only even for associates whose company
/// participates, and the client summary never reaches associates at all: it
/// aggregates competing prices.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_only_surfaces_reject_associates(pool: PgPool) {
    let staff = seed_user(&pool, "staffer", 2, None).await;
    let app = build_test_app(pool.clone());

    let (request_id, requirement_id) =
        seed_request(&app, &staff, "Minera Cascada", "Overhaul molino SAG").await;
    let company_id = create_company(&app, &staff, "Talleres Andinos").await;
    sync_companies(&app, &staff, request_id, requirement_id, &[company_id]).await;
    let pid = participant_of(&app, &staff, request_id, requirement_id, company_id).await;
    let associate = seed_user(&pool, "aranda", 3, Some(company_id)).await;

    let body = serde_json::json!({ "title": "Otro", "client_area_id": 1 });
    let response = post_json_auth(app.clone(), "/api/v1/project_requests", &associate, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = serde_json::json!({ "name": "Nuevo requerimiento" });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{request_id}/requirements"),
        &associate,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let parts = [Part { name: "selectedCompanies", file_name: None, data: b"[1]" }];
    let response = post_multipart_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{request_id}/requirements/{requirement_id}/participants"),
        &associate,
        &parts,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = set_status(&app, &associate, pid, 3).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let parts = [
        Part { name: "file", file_name: Some("nda.pdf"), data: NDA_BYTES },
        Part { name: "expires_at", file_name: None, data: b"2030-12-31" },
    ];
    let response = post_multipart_auth(
        app.clone(),
        &format!("/api/v1/participants/{pid}/nda"),
        &associate,
        &parts,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/participants/{pid}/nda"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The client summary aggregates every company's price.
    let uri = format!("/api/v1/project_requests/{request_id}/client-quotation");
    let response = get_auth(app.clone(), &uri, &associate).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let parts = [Part { name: "quotationIds", file_name: None, data: b"[]" }];
    let response = post_multipart_auth(app.clone(), &uri, &associate, &parts).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app.clone(), &format!("{uri}/file"), &associate).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(
        app,
        &format!("/api/v1/project_requests/{request_id}"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Request visibility
// ---------------------------------------------------------------------------

/// Associates list and read only the requests their company participates in.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_associate_sees_only_own_requests(pool: PgPool) {
    let staff = seed_user(&pool, "staffer", 2, None).await;
    let app = build_test_app(pool.clone());

    let (own_request, own_requirement) =
        seed_request(&app, &staff, "Minera Cascada", "Overhaul molino SAG").await;
    let (other_request, other_requirement) =
        seed_request(&app, &staff, "Papelera Austral", "Linea de embalaje").await;

    let own_company = create_company(&app, &staff, "Talleres Andinos").await;
    let other_company = create_company(&app, &staff, "Montajes Rapidos").await;
    sync_companies(&app, &staff, own_request, own_requirement, &[own_company]).await;
    sync_companies(&app, &staff, other_request, other_requirement, &[other_company]).await;
    let associate = seed_user(&pool, "aranda", 3, Some(own_company)).await;

    // The listing is filtered.
    let response = get_auth(app.clone(), "/api/v1/project_requests", &associate).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], own_request);

    // Direct reads follow the same rule.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{own_request}"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{other_request}"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // So do the nested requirement listings.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/project_requests/{other_request}/requirements"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff see the whole register.
    let response = get_auth(app, "/api/v1/project_requests", &staff).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

/// An associate account without a company link cannot use company-scoped
/// surfaces at all.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unlinked_associate_is_rejected(pool: PgPool) {
    let orphan = seed_user(&pool, "orphan", 3, None).await;
    let app = build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/assigned_companies", &orphan).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app, "/api/v1/project_requests", &orphan).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Assigned companies listing
// ---------------------------------------------------------------------------

/// The cross-project listing: envelope shape, pagination, search, the
/// only_active filter, the basic payload and the associate company pin.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_assigned_companies_listing(pool: PgPool) {
    let staff = seed_user(&pool, "staffer", 2, None).await;
    let app = build_test_app(pool.clone());

    let (request_id, first_req) =
        seed_request(&app, &staff, "Minera Cascada", "Overhaul molino SAG").await;
    let second_req =
        create_requirement(&app, &staff, request_id, "Fabricacion de estanques").await;
    let pinned = create_company(&app, &staff, "Talleres Andinos").await;
    let other = create_company(&app, &staff, "Montajes Rapidos").await;
    sync_companies(&app, &staff, request_id, first_req, &[pinned, other]).await;
    sync_companies(&app, &staff, request_id, second_req, &[pinned]).await;
    let associate = seed_user(&pool, "aranda", 3, Some(pinned)).await;

    // Staff see all three assignments in the envelope.
    let response = get_auth(app.clone(), "/api/v1/assigned_companies", &staff).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 20);
    assert_eq!(page["data"].as_array().unwrap().len(), 3);
    // Full rows carry the nested display columns.
    assert!(page["data"][0].get("requirement").is_some());
    assert!(page["data"][0].get("client").is_some());

    // Pagination slices the same total.
    let response = get_auth(app.clone(), "/api/v1/assigned_companies?limit=2", &staff).await;
    let page = body_json(response).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    let response = get_auth(
        app.clone(),
        "/api/v1/assigned_companies?limit=2&page=2",
        &staff,
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["page"], 2);

    // Search matches the company name.
    let response = get_auth(
        app.clone(),
        "/api/v1/assigned_companies?search=Andinos",
        &staff,
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["total"], 2);
    for row in page["data"].as_array().unwrap() {
        assert_eq!(row["company"], "Talleres Andinos");
    }

    // The basic payload drops the heavy columns.
    let response = get_auth(app.clone(), "/api/v1/assigned_companies?basic=true", &staff).await;
    let page = body_json(response).await;
    let row = &page["data"][0];
    assert!(row.get("project_request").is_some());
    assert!(row.get("requirement").is_none());
    assert!(row.get("client").is_none());

    // Associates get their own company regardless of what they ask for.
    let response = get_auth(app.clone(), "/api/v1/assigned_companies", &associate).await;
    let page = body_json(response).await;
    assert_eq!(page["total"], 2);
    for row in page["data"].as_array().unwrap() {
        assert_eq!(row["company_id"], pinned);
    }
    let response = get_auth(
        app.clone(),
        "/api/v1/assigned_companies?search=Rapidos",
        &associate,
    )
    .await;
    assert_eq!(body_json(response).await["total"], 0);

    // Terminal stages drop out under only_active.
    let pid = participant_of(&app, &staff, request_id, first_req, pinned).await;
    for status_id in [3, 4, 5, 6, 7, 9] {
        let response = set_status(&app, &staff, pid, status_id).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = get_auth(
        app.clone(),
        "/api/v1/assigned_companies?only_active=true",
        &staff,
    )
    .await;
    assert_eq!(body_json(response).await["total"], 2);
    let response = get_auth(
        app,
        "/api/v1/assigned_companies?only_active=true",
        &associate,
    )
    .await;
    assert_eq!(body_json(response).await["total"], 1);
}

// ---------------------------------------------------------------------------
// Participant documents
// ---------------------------------------------------------------------------

/// NDA downloads and quotations are reachable by staff and by the owning
/// company's users, never by other associates.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_participant_documents_scoped_to_company(pool: PgPool) {
    let staff = seed_user(&pool, "staffer", 2, None).await;
    let app = build_test_app(pool.clone());

    let (request_id, requirement_id) =
        seed_request(&app, &staff, "Minera Cascada", "Overhaul molino SAG").await;
    let own = create_company(&app, &staff, "Talleres Andinos").await;
    let other = create_company(&app, &staff, "Montajes Rapidos").await;
    sync_companies(&app, &staff, request_id, requirement_id, &[own, other]).await;
    let own_pid = participant_of(&app, &staff, request_id, requirement_id, own).await;
    let other_pid = participant_of(&app, &staff, request_id, requirement_id, other).await;
    upload_nda(&app, &staff, own_pid).await;
    upload_nda(&app, &staff, other_pid).await;
    let associate = seed_user(&pool, "aranda", 3, Some(own)).await;

    // NDA downloads.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/participants/{own_pid}/nda/file"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/participants/{other_pid}/nda/file"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Quotations: the owning company submits and reads its own.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/participants/{own_pid}/quotation"),
        &associate,
        quotation_body(480_000),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/participants/{own_pid}/quotation"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["price_cents"], 480_000);

    // Another company's participant is off limits both ways.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/participants/{other_pid}/quotation"),
        &associate,
        quotation_body(999_000),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/participants/{other_pid}/quotation"),
        &associate,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff pass the access check; the missing quotation is then a plain 404.
    let response = get_auth(
        app,
        &format!("/api/v1/participants/{other_pid}/quotation"),
        &staff,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Conversation and unread counters
// ---------------------------------------------------------------------------

/// Messages are readable by staff and participating companies only; unread
/// counters track the reader's cursor and exclude their own messages.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_conversation_and_unread_counts(pool: PgPool) {
    let staff = seed_user(&pool, "staffer", 2, None).await;
    let app = build_test_app(pool.clone());

    let (request_id, requirement_id) =
        seed_request(&app, &staff, "Minera Cascada", "Overhaul molino SAG").await;
    let member = create_company(&app, &staff, "Talleres Andinos").await;
    let outsider_company = create_company(&app, &staff, "Montajes Rapidos").await;
    sync_companies(&app, &staff, request_id, requirement_id, &[member]).await;
    let associate = seed_user(&pool, "aranda", 3, Some(member)).await;
    let outsider = seed_user(&pool, "belmar", 3, Some(outsider_company)).await;

    let uri = format!("/api/v1/project_requests/{request_id}/messages");
    let counts_uri = format!("/api/v1/messages/unread-counts?project_request_ids={request_id}");

    // Non-participating companies cannot read or post.
    let response = get_auth(app.clone(), &uri, &outsider).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = serde_json::json!({ "body": "hola" });
    let response = post_json_auth(app.clone(), &uri, &outsider, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff open the conversation.
    let body = serde_json::json!({ "body": "Buenas tardes, adjunto el alcance." });
    let response = post_json_auth(app.clone(), &uri, &staff, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let message = body_json(response).await;
    assert_eq!(message["sender"], "staffer");

    // The associate reads it and sees one unread.
    let response = get_auth(app.clone(), &uri, &associate).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["body"], "Buenas tardes, adjunto el alcance.");

    let response = get_auth(app.clone(), &counts_uri, &associate).await;
    assert_eq!(response.status(), StatusCode::OK);
    let counts = body_json(response).await;
    assert_eq!(counts[0]["project_request_id"], request_id);
    assert_eq!(counts[0]["unread"], 1);
    // Served from the cache on the second ask.
    let response = get_auth(app.clone(), &counts_uri, &associate).await;
    assert_eq!(body_json(response).await[0]["unread"], 1);

    // Replying does not count against the sender, but does for the staff.
    let body = serde_json::json!({ "body": "Recibido, cotizamos esta semana." });
    let response = post_json_auth(app.clone(), &uri, &associate, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = get_auth(app.clone(), &counts_uri, &associate).await;
    assert_eq!(body_json(response).await[0]["unread"], 1);
    let response = get_auth(app.clone(), &counts_uri, &staff).await;
    assert_eq!(body_json(response).await[0]["unread"], 1);

    // Marking read zeroes the caller only.
    let response = post_auth(app.clone(), &format!("{uri}/read"), &associate).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(app.clone(), &counts_uri, &associate).await;
    assert_eq!(body_json(response).await[0]["unread"], 0);
    let response = get_auth(app.clone(), &counts_uri, &staff).await;
    assert_eq!(body_json(response).await[0]["unread"], 1);

    // A new message invalidates the cached zero.
    let body = serde_json::json!({ "body": "Perfecto, quedamos atentos." });
    let response = post_json_auth(app.clone(), &uri, &staff, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = get_auth(app.clone(), &counts_uri, &associate).await;
    assert_eq!(body_json(response).await[0]["unread"], 1);

    // Pagination over the conversation.
    let response = get_auth(app.clone(), &format!("{uri}?limit=2"), &staff).await;
    let page = body_json(response).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    let response = get_auth(app.clone(), &format!("{uri}?limit=2&offset=2"), &staff).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    // Input validation.
    let body = serde_json::json!({ "body": "   " });
    let response = post_json_auth(app.clone(), &uri, &staff, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = get_auth(
        app.clone(),
        "/api/v1/messages/unread-counts?project_request_ids=1,x",
        &staff,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = get_auth(
        app,
        "/api/v1/messages/unread-counts?project_request_ids=",
        &staff,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
