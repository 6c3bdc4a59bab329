//! HTTP contract of the Supabase adapter, against a mock server.

use amparo_app::domains::auth::security::SecureCredential;
use amparo_app::infra::services::{
    AuthProvider, Credentials, ProfileRepository, ResetPasswordOptions, SubscriptionEvent,
};
use amparo_app::infra::supabase::{ClientOptions, SessionStorage, SupabaseClient};
use amparo_model::{
    AuthChangeEvent, AuthUser, ProfileUpdate, ProfileUpsert, Session, UserId,
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{
    body_partial_json, header, headers, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANON_KEY: &str = "anon-key";
const USER_ID: &str = "6f1c2a8e-4a4b-4c57-9d2e-0b7f3c1e2a90";

fn user_id() -> UserId {
    UserId(Uuid::parse_str(USER_ID).expect("uuid"))
}

fn client(server: &MockServer, storage: Option<SessionStorage>) -> SupabaseClient {
    let url = Url::parse(&server.uri()).expect("mock url");
    SupabaseClient::new(
        url,
        ANON_KEY,
        ClientOptions {
            storage,
            ..ClientOptions::default()
        },
    )
    .expect("client")
}

fn credentials() -> Credentials {
    Credentials::new("ana@example.com", SecureCredential::new("secret1".into()))
}

fn session_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": format!("{access_token}-refresh"),
        "token_type": "bearer",
        "expires_in": 3600,
        "user": { "id": USER_ID, "email": "ana@example.com" }
    })
}

fn expired_session() -> Session {
    Session {
        access_token: "stale".into(),
        refresh_token: "stale-refresh".into(),
        token_type: "bearer".into(),
        expires_in: 3600,
        expires_at: Some(Utc::now() - Duration::minutes(5)),
        user: AuthUser {
            id: user_id(),
            email: Some("ana@example.com".into()),
        },
    }
}

async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("fresh")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sign_in_posts_password_grant_and_emits_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .and(body_partial_json(json!({
            "email": "ana@example.com",
            "password": "secret1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, None);
    let mut changes = client.subscribe();
    let session = client.sign_in(credentials()).await.expect("signed in");

    assert_eq!(session.user_id(), user_id());
    assert!(session.expires_at.is_some());
    assert_eq!(client.current_session(), Some(session));
    match changes.try_next() {
        Some(SubscriptionEvent::Change(change)) => {
            assert_eq!(change.event, AuthChangeEvent::SignedIn);
        }
        other => panic!("expected SIGNED_IN, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_sign_in_surfaces_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let client = client(&server, None);
    let mut changes = client.subscribe();
    let err = client.sign_in(credentials()).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(client.current_session().is_none());
    assert!(changes.try_next().is_none());
}

#[tokio::test]
async fn sign_up_for_existing_address_withholds_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "email": "ana@example.com",
            "identities": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server, None)
        .sign_up(credentials())
        .await
        .expect("sign up");
    assert!(outcome.user.is_none());
    assert!(outcome.session.is_none());
}

#[tokio::test]
async fn sign_up_without_confirmation_signs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("new")))
        .mount(&server)
        .await;

    let client = client(&server, None);
    let outcome = client.sign_up(credentials()).await.expect("sign up");
    assert_eq!(outcome.user.map(|user| user.id), Some(user_id()));
    assert_eq!(
        client.current_session().map(|session| session.access_token),
        Some("new".to_string())
    );
}

#[tokio::test]
async fn reset_password_passes_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/recover"))
        .and(query_param("redirect_to", "myapp://reset-password"))
        .and(body_partial_json(json!({ "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, None)
        .reset_password(
            "ana@example.com".into(),
            ResetPasswordOptions {
                redirect_to: "myapp://reset-password".into(),
            },
        )
        .await
        .expect("reset email");
}

#[tokio::test]
async fn sign_out_tolerates_revoked_token() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "msg": "invalid JWT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, None);
    client.sign_in(credentials()).await.expect("signed in");
    let mut changes = client.subscribe();

    client.sign_out().await.expect("signed out");
    assert!(client.current_session().is_none());
    match changes.try_next() {
        Some(SubscriptionEvent::Change(change)) => {
            assert_eq!(change.event, AuthChangeEvent::SignedOut);
            assert!(change.session.is_none());
        }
        other => panic!("expected SIGNED_OUT, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_out_reports_server_failure() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = client(&server, None);
    client.sign_in(credentials()).await.expect("signed in");
    let err = client.sign_out().await.unwrap_err();
    assert_eq!(err.to_string(), "upstream down");
    assert!(client.current_session().is_some());
}

#[tokio::test]
async fn expired_persisted_session_is_refreshed_on_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_partial_json(json!({ "refresh_token": "stale-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("renewed")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let storage = SessionStorage::new(dir.path().join("session.json"));
    storage.save(&expired_session()).await.expect("seed session");

    let client = client(&server, Some(storage.clone()));
    let mut changes = client.subscribe();
    let session = client
        .get_session()
        .await
        .expect("query")
        .expect("session");

    assert_eq!(session.access_token, "renewed");
    let persisted = storage.load().await.expect("load").expect("persisted");
    assert_eq!(persisted.access_token, "renewed");
    match changes.try_next() {
        Some(SubscriptionEvent::Change(change)) => {
            assert_eq!(change.event, AuthChangeEvent::TokenRefreshed);
        }
        other => panic!("expected TOKEN_REFRESHED, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_refresh_token_ends_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let storage = SessionStorage::new(dir.path().join("session.json"));
    storage.save(&expired_session()).await.expect("seed session");

    let client = client(&server, Some(storage.clone()));
    assert_eq!(client.get_session().await.expect("query"), None);
    assert_eq!(storage.load().await.expect("load"), None);
}

#[tokio::test]
async fn live_session_is_served_without_network() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("tempdir");
    let storage = SessionStorage::new(dir.path().join("session.json"));
    let mut live = expired_session();
    live.expires_at = Some(Utc::now() + Duration::hours(1));
    storage.save(&live).await.expect("seed session");

    let session = client(&server, Some(storage))
        .get_session()
        .await
        .expect("query");
    assert_eq!(session.map(|session| session.access_token), Some("stale".into()));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn profile_upsert_merges_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(headers(
            "prefer",
            vec!["resolution=merge-duplicates", "return=minimal"],
        ))
        .and(header("authorization", format!("Bearer {ANON_KEY}").as_str()))
        .and(body_partial_json(json!({
            "id": USER_ID,
            "name": "Ana",
            "last_name": "Silva",
            "phone_number": null
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, None)
        .upsert_profile(ProfileUpsert {
            id: user_id(),
            name: "Ana".into(),
            last_name: "Silva".into(),
            phone_number: None,
            updated_at: Utc::now(),
        })
        .await
        .expect("upsert");
}

#[tokio::test]
async fn profile_update_filters_by_id_with_user_token() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", format!("eq.{USER_ID}").as_str()))
        .and(header("authorization", "Bearer fresh"))
        .and(body_partial_json(json!({ "name": "Maria", "phone_number": "123" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, None);
    client.sign_in(credentials()).await.expect("signed in");
    client
        .update_profile(
            user_id(),
            ProfileUpdate {
                name: "Maria".into(),
                last_name: "Silva".into(),
                phone_number: Some("123".into()),
                updated_at: Utc::now(),
            },
        )
        .await
        .expect("update");
}

#[tokio::test]
async fn profile_fetch_reads_first_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("select", "id,name,last_name,phone_number,updated_at"))
        .and(query_param("id", format!("eq.{USER_ID}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": USER_ID,
            "name": "Ana",
            "last_name": "Silva",
            "phone_number": null,
            "updated_at": "2026-10-01T12:00:00+00:00"
        }])))
        .mount(&server)
        .await;

    let profile = client(&server, None)
        .fetch_profile(user_id())
        .await
        .expect("fetch")
        .expect("row");
    assert_eq!(profile.full_name().as_deref(), Some("Ana Silva"));
    assert!(profile.updated_at.is_some());
}

#[tokio::test]
async fn profile_fetch_without_row_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let profile = client(&server, None)
        .fetch_profile(user_id())
        .await
        .expect("fetch");
    assert_eq!(profile, None);
}

#[tokio::test]
async fn row_level_security_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "new row violates row-level security policy for table \"profiles\""
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .upsert_profile(ProfileUpsert {
            id: user_id(),
            name: "Ana".into(),
            last_name: "Silva".into(),
            phone_number: None,
            updated_at: Utc::now(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("row-level security"));
}
