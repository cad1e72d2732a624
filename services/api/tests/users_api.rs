//! End-to-end tests for the user endpoints
//!
//! Each test serves the full router over fresh in-memory stores on a random
//! port and talks to it with `reqwest`.

use giftr_api::{
    AppState,
    auth::JwtService,
    config::AuthConfig,
    models::{Match, TokenResponse, UserDetail, UserSummary},
    repositories::{CredentialStore, MemoryCredentialStore, MemoryMatchStore, MemoryUserStore},
    routes::create_router,
};
use reqwest::{Client, Response, StatusCode, header};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Server on a random port plus handles on the stores behind it
struct TestApp {
    address: String,
    client: Client,
    matches: Arc<MemoryMatchStore>,
    credentials: Arc<MemoryCredentialStore>,
    jwt: JwtService,
}

impl TestApp {
    async fn new() -> Self {
        let matches = Arc::new(MemoryMatchStore::new());
        let credentials = Arc::new(MemoryCredentialStore::new());
        let jwt = JwtService::new(&AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_expiry: 900,
        });

        let state = AppState {
            user_store: Arc::new(MemoryUserStore::new()),
            match_store: matches.clone(),
            credential_store: credentials.clone(),
            jwt_service: jwt.clone(),
        };
        let app = create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            address: format!("http://127.0.0.1:{port}"),
            client: Client::new(),
            matches,
            credentials,
            jwt,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str) -> Response {
        self.client.post(self.url(path)).send().await.unwrap()
    }

    async fn put(&self, path: &str) -> Response {
        self.client.put(self.url(path)).send().await.unwrap()
    }

    async fn signup(&self, query: &str) -> UserDetail {
        let response = self.post(&format!("/users/signup?{}", query)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn me(&self, token: Option<&str>) -> Response {
        let mut request = self.client.get(self.url("/users/me"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_signup_applies_defaults() {
    let app = TestApp::new().await;
    let user = app.signup("username=alice").await;

    assert_eq!(user.username.as_deref(), Some("alice"));
    assert_eq!(user.status.0, 1);
    assert_eq!(user.gender.0, 1);
    assert_eq!(user.gift_type.0, 1);
    assert_eq!(user.price_min, 0);
    assert_eq!(user.price_max, 0);
    assert_eq!(user.location, None);
    assert_eq!(user.interests, None);
}

#[tokio::test]
async fn test_signup_sets_location_header_and_round_trips() {
    let app = TestApp::new().await;
    let response = app
        .post(
            "/users/signup?username=bob&gender=2&location=Seattle&giftType=3&interests=climbing&priceMin=15&priceMax=40",
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created_location = location(&response);
    let created: UserDetail = response.json().await.unwrap();
    assert_eq!(created_location, format!("/users/{}", created.id));

    let response = app.get(&created_location).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), created_location);
    let fetched: UserDetail = response.json().await.unwrap();

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.username.as_deref(), Some("bob"));
    assert_eq!(fetched.gender.0, 2);
    assert_eq!(fetched.location.as_deref(), Some("Seattle"));
    assert_eq!(fetched.gift_type.0, 3);
    assert_eq!(fetched.interests.as_deref(), Some("climbing"));
    assert_eq!(fetched.price_min, 15);
    assert_eq!(fetched.price_max, 40);
    assert_eq!(fetched.status.0, 1);
}

#[tokio::test]
async fn test_signup_with_password_creates_credentials() {
    let app = TestApp::new().await;
    app.signup("username=alice&password=secret").await;

    assert!(app.credentials.find_pair("alice").await.unwrap().is_some());

    let response = app.login("alice", "secret").await;
    assert_eq!(response.status(), StatusCode::OK);
    let token: TokenResponse = response.json().await.unwrap();
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 900);
}

#[tokio::test]
async fn test_signup_without_password_creates_no_credentials() {
    let app = TestApp::new().await;
    app.signup("username=alice").await;

    assert!(app.credentials.find_pair("alice").await.unwrap().is_none());
    assert_eq!(
        app.login("alice", "anything").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_signup_duplicate_username_fails_with_500() {
    let app = TestApp::new().await;
    app.signup("username=alice").await;

    let response = app.post("/users/signup?username=alice").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "Unable to create user.");
}

#[tokio::test]
async fn test_signup_rejects_invalid_input() {
    let app = TestApp::new().await;

    for query in ["username=a%20b", "priceMin=-5", "gender=two"] {
        let response = app.post(&format!("/users/signup?{}", query)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", query);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].is_string(), "{}", query);
    }
}

#[tokio::test]
async fn test_malformed_parameters_return_json_errors() {
    let app = TestApp::new().await;
    let user = app.signup("username=alice").await;

    let responses = [
        app.get("/users/abc").await,
        app.get("/users?gender=two").await,
        app.get("/users/abc/matches").await,
        app.put(&format!("/users/{}?priceMin=x", user.id)).await,
    ];

    for response in responses {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "{}", content_type);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_login_with_malformed_body_returns_json_error() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/auth/login"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{\"username\": \"alice\"")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_unknown_user_is_404() {
    let app = TestApp::new().await;
    let response = app.get("/users/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Could not find user '999'.");
}

#[tokio::test]
async fn test_update_only_changes_supplied_fields() {
    let app = TestApp::new().await;
    let created = app
        .signup("username=carol&gender=2&location=LA&giftType=4&interests=hiking&priceMin=20&priceMax=80")
        .await;

    let response = app
        .put(&format!("/users/{}?location=NYC", created.id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), format!("/users/{}?location=NYC", created.id));
    let updated: UserDetail = response.json().await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.location.as_deref(), Some("NYC"));
    assert_eq!(updated.username, created.username);
    assert_eq!(updated.gender, created.gender);
    assert_eq!(updated.gift_type, created.gift_type);
    assert_eq!(updated.interests, created.interests);
    assert_eq!(updated.price_min, created.price_min);
    assert_eq!(updated.price_max, created.price_max);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.signup_date, created.signup_date);
}

#[tokio::test]
async fn test_concurrent_updates_of_different_fields_both_apply() {
    let app = TestApp::new().await;
    let created = app.signup("username=hana&location=Kyoto&interests=tea").await;

    let location = format!("/users/{}?location=Osaka", created.id);
    let interests = format!("/users/{}?interests=origami", created.id);
    let (first, second) = tokio::join!(app.put(&location), app.put(&interests));
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let user: UserDetail = app
        .get(&format!("/users/{}", created.id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(user.location.as_deref(), Some("Osaka"));
    assert_eq!(user.interests.as_deref(), Some("origami"));
}

#[tokio::test]
async fn test_update_unknown_user_is_404() {
    let app = TestApp::new().await;
    let response = app.put("/users/42?location=NYC").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_username_and_password_updates_credentials() {
    let app = TestApp::new().await;
    let created = app.signup("username=dave&password=first").await;

    let response = app
        .put(&format!(
            "/users/{}?username=david&password=second",
            created.id
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(app.credentials.find_pair("dave").await.unwrap().is_none());
    assert_eq!(app.login("david", "second").await.status(), StatusCode::OK);
    assert_eq!(
        app.login("david", "first").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_rename_keeps_existing_login() {
    let app = TestApp::new().await;
    let created = app.signup("username=erin&password=hunter2").await;

    let response = app
        .put(&format!("/users/{}?username=erin_b", created.id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(app.login("erin_b", "hunter2").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_to_taken_username_conflicts() {
    let app = TestApp::new().await;
    app.signup("username=frank").await;
    let grace = app.signup("username=grace").await;

    let response = app
        .put(&format!("/users/{}?username=frank", grace.id))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_search_without_parameters_returns_non_deleted_users() {
    let app = TestApp::new().await;
    let first = app.signup("username=ann").await;
    let second = app.signup("username=ben&gender=2").await;
    app.signup("username=gone&status=0").await;

    let response = app.get("/users").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), "/users");
    let users: Vec<UserSummary> = response.json().await.unwrap();

    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_search_filters_by_gender() {
    let app = TestApp::new().await;
    app.signup("username=ann&gender=1").await;
    let ben = app.signup("username=ben&gender=2").await;
    let cat = app.signup("username=cat&gender=2").await;

    let response = app.get("/users?gender=2").await;
    assert_eq!(location(&response), "/users?gender=2");
    let users: Vec<UserSummary> = response.json().await.unwrap();

    assert!(users.iter().all(|u| u.gender.0 == 2));
    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![ben.id, cat.id]);
}

#[tokio::test]
async fn test_search_results_use_summary_view() {
    let app = TestApp::new().await;
    app.signup("username=ann&location=Boston").await;

    let response = app.get("/users?location=bos").await;
    let users: Vec<serde_json::Value> = response.json().await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["location"], "Boston");
    assert!(users[0].get("status").is_none());
    assert!(users[0].get("signupDate").is_none());
}

#[tokio::test]
async fn test_matches_for_user_without_matches_is_empty() {
    let app = TestApp::new().await;
    let user = app.signup("username=ann").await;

    let response = app.get(&format!("/users/{}/matches", user.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let matches: Vec<Match> = response.json().await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_matches_for_unknown_user_is_404() {
    let app = TestApp::new().await;
    let response = app.get("/users/7/matches").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_matches_lists_both_sides() {
    let app = TestApp::new().await;
    let ann = app.signup("username=ann").await;
    let ben = app.signup("username=ben").await;
    let cat = app.signup("username=cat").await;
    app.matches.record(ann.id, ben.id).await;
    app.matches.record(cat.id, ann.id).await;
    app.matches.record(ben.id, cat.id).await;

    let response = app.get(&format!("/users/{}/matches", ann.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let matches: Vec<Match> = response.json().await.unwrap();

    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.involves(ann.id)));
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;
    assert_eq!(app.me(None).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.me(Some("not-a-token")).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_me_returns_caller() {
    let app = TestApp::new().await;
    let created = app.signup("username=alice&password=secret&location=Denver").await;

    let token: TokenResponse = app.login("alice", "secret").await.json().await.unwrap();
    let response = app.me(Some(&token.access_token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), "/users/me");
    let user: UserDetail = response.json().await.unwrap();
    assert_eq!(user.id, created.id);
    assert_eq!(user.location.as_deref(), Some("Denver"));
}

#[tokio::test]
async fn test_me_for_principal_without_user_is_404() {
    let app = TestApp::new().await;
    let token = app.jwt.issue_token("ghost").unwrap();

    let response = app.me(Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Could not find user 'ghost'.");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_401() {
    let app = TestApp::new().await;
    app.signup("username=alice&password=secret").await;

    assert_eq!(
        app.login("alice", "wrong").await.status(),
        StatusCode::UNAUTHORIZED
    );
}
