use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketdesk::error::DeskError;
use ticketdesk::remote::{Agent, Gender, HttpBackend, NewUser, Profile, TicketBackend};
use ticketdesk::session::Credentials;
use ticketdesk::ticket::Ticket;
use ticketdesk::transition::{TicketAction, TransitionRequest};
use ticketdesk::types::{Role, TicketStatus};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn agent_session() -> Credentials {
    Credentials::new("ana@example.com", "tok-agent", Role::Agent)
}

fn admin_session() -> Credentials {
    Credentials::new("root@example.com", "tok-admin", Role::Admin)
}

#[tokio::test]
async fn test_authenticate_maps_role() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/authenticate/"))
        .and(body_json(json!({ "email": "root@example.com", "password": "secret1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "abc", "role": "ADMIN" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials = backend(&server)
        .authenticate("root@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(credentials.role, Role::Admin);
    assert_eq!(credentials.token(), "abc");
}

#[tokio::test]
async fn test_authenticate_rejects_bad_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/authenticate/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .authenticate("ana@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::Auth(_)));
    assert!(err.to_string().contains("invalid email or password"));
}

#[tokio::test]
async fn test_fetch_tickets_uses_role_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ticket/getMyTickets"))
        .and(body_json(json!({ "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "subject": "Printer", "content": "Out of toner", "status": "NEW",
              "category": "Hardware", "priority": "high" },
            { "id": 2, "status": "RESOLVED" },
            { "subject": "no id at all", "status": "OPEN" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let parsed = backend(&server)
        .fetch_tickets(&agent_session())
        .await
        .unwrap();
    assert_eq!(parsed.tickets.len(), 2);
    assert_eq!(parsed.tickets[0].title(), "Printer");
    assert_eq!(parsed.tickets[1].title(), "Untitled");
    assert_eq!(
        parsed.tickets[1].status,
        TicketStatus::Unknown("RESOLVED".to_string())
    );
    assert!(!parsed.warnings.is_empty());
}

#[tokio::test]
async fn test_admin_fetches_all_tickets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/getAllTickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let parsed = backend(&server)
        .fetch_tickets(&admin_session())
        .await
        .unwrap();
    assert!(parsed.tickets.is_empty());
}

#[tokio::test]
async fn test_fetch_tickets_surfaces_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ticket/getMyTickets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .fetch_tickets(&agent_session())
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"));
    assert!(message.contains("database down"));
}

#[tokio::test]
async fn test_non_array_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ticket/getMyTickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tickets": [] })))
        .mount(&server)
        .await;

    let err = backend(&server)
        .fetch_tickets(&agent_session())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("expected a JSON array"));
}

#[tokio::test]
async fn test_update_ticket_sends_target_status_and_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ticket/updateTicket"))
        .and(body_json(json!({
            "ticketId": "42",
            "status": "CLOSED",
            "token": "tok-agent",
            "reply": "Replaced the cable",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = Ticket::new("42", TicketStatus::Open);
    let request = TransitionRequest::for_ticket(
        &ticket,
        TicketAction::Resolve,
        Some("Replaced the cable".to_string()),
    )
    .unwrap();
    backend(&server)
        .update_ticket(&request, &agent_session())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_ticket_without_reply_sends_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ticket/updateTicket"))
        .and(body_json(json!({
            "ticketId": "8",
            "status": "OPEN",
            "token": "tok-agent",
            "reply": "",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = Ticket::new("8", TicketStatus::Closed);
    let request = TransitionRequest::for_ticket(&ticket, TicketAction::Reopen, None).unwrap();
    backend(&server)
        .update_ticket(&request, &agent_session())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fetch_profile_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/getProfileData"))
        .and(body_json(json!({ "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Ana", "phone": "555-0101", "city": "Lima", "zip": 15001,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = backend(&server)
        .fetch_profile(&agent_session())
        .await
        .unwrap();
    assert_eq!(profile.name, "Ana");
    assert_eq!(profile.email, "ana@example.com");
    assert_eq!(profile.zip, "15001");
    assert_eq!(profile.country, "");
}

#[tokio::test]
async fn test_update_profile_sends_form_with_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/updateProfile"))
        .and(body_json(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "phone": "555-0101",
            "address": "",
            "city": "Cusco",
            "state": "",
            "zip": "",
            "country": "PE",
            "password": "",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = Profile {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        phone: "555-0101".to_string(),
        city: "Cusco".to_string(),
        country: "PE".to_string(),
        ..Profile::default()
    };
    backend(&server).update_profile(&profile, "").await.unwrap();
}

#[tokio::test]
async fn test_edit_agent_returns_stored_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/editProfile"))
        .and(body_partial_json(json!({
            "token": "tok-admin",
            "agent": { "id": "3", "firstName": "Anabel", "phone": "555-0199" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "firstName": "Anabel", "username": "ana", "email": "ana@example.com",
            "role": "AGENT", "phone": "555-0199", "enabled": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agent: Agent = serde_json::from_value(json!({
        "id": 3, "firstName": "Anabel", "username": "ana", "email": "ana@example.com",
        "role": "AGENT", "phone": "555-0199", "enabled": true,
    }))
    .unwrap();
    let updated = backend(&server)
        .edit_agent(&agent, &admin_session())
        .await
        .unwrap();
    assert_eq!(updated, agent);
}

#[tokio::test]
async fn test_edit_agent_rejected_by_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/editProfile"))
        .respond_with(ResponseTemplate::new(400).set_body_string("email already taken"))
        .mount(&server)
        .await;

    let agent: Agent =
        serde_json::from_value(json!({ "id": 3, "email": "dup@example.com" })).unwrap();
    let err = backend(&server)
        .edit_agent(&agent, &admin_session())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("email already taken"));
}

#[tokio::test]
async fn test_delete_agent_sends_whole_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/getAgents"))
        .and(body_json(json!({ "token": "tok-admin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "firstName": "Ana", "username": "ana", "email": "ana@example.com",
              "role": "AGENT", "enabled": true },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/deleteProfile"))
        .and(body_partial_json(json!({
            "token": "tok-admin",
            "agent": { "id": "3", "email": "ana@example.com" },
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server);
    let admin = admin_session();
    let agents: Vec<Agent> = backend.fetch_agents(&admin).await.unwrap();
    assert_eq!(agents[0].id.as_deref(), Some("3"));
    backend.delete_agent(&agents[0], &admin).await.unwrap();
}

#[tokio::test]
async fn test_create_user_posts_to_role_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/createAgent"))
        .and(body_partial_json(json!({
            "firstName": "Dana",
            "username": "dana",
            "role": "AGENT",
            "gender": "FEMALE",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let user = NewUser {
        first_name: "Dana".to_string(),
        username: "dana".to_string(),
        password: "hunter22".to_string(),
        email: "dana@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip: "62701".to_string(),
        country: "US".to_string(),
        role: Role::Agent,
        gender: Gender::Female,
    };
    backend(&server).create_user(&user).await.unwrap();
}

#[tokio::test]
async fn test_agent_stats_default_missing_counts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ticket/getMyStats"))
        .and(body_json(json!({ "token": "tok-agent" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "SOLVED_DAILY": 2,
            "DAILY_TICKETS": 5,
        })))
        .mount(&server)
        .await;

    let stats = backend(&server)
        .fetch_agent_stats(&agent_session())
        .await
        .unwrap();
    assert_eq!(stats.solved_daily, 2);
    assert_eq!(stats.daily_tickets, 5);
    assert_eq!(stats.monthly_tickets, 0);
}

#[tokio::test]
async fn test_password_reset_unknown_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/forget-password"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = backend(&server)
        .request_password_reset("ghost@example.com")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no user found"));
}
