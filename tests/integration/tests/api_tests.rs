//! API integration tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET, API_PORT
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, id_of, Account,
    TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn server() -> TestServer {
    TestServer::start().await.expect("Failed to start server")
}

async fn create_queue(server: &TestServer, admin: &Account) -> String {
    let response = server
        .post_auth("/admin/queues", &admin.access_token, &QueueRequest::unique())
        .await
        .unwrap();
    let queue: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    id_of(&queue)
}

async fn open_ticket(server: &TestServer, owner: &Account, queue_id: &str) -> String {
    let response = server
        .post_auth("/user/tickets", &owner.access_token, &CreateTicketRequest::new(queue_id))
        .await
        .unwrap();
    let ticket: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    id_of(&ticket)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let response = server.get_root("/health").await.unwrap();
    let health: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let response = server.get_root("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let auth: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth["user"]["email"], request.email.as_str());
    assert_eq!(auth["user"]["role"], "user");
    assert!(auth["user"].get("password_hash").is_none());
    assert!(!auth["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let response = server.post("/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "USER_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_validation_error() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let mut request = RegisterRequest::unique();
    request.email = "not-an-email".to_string();

    let response = server.post("/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let account = server.register_user().await.unwrap();
    let request = LoginRequest {
        email: account.email,
        password: "wrongpass1".to_string(),
    };

    let response = server.post("/auth/login", &request).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let account = server.register_user().await.unwrap();
    let request = RefreshTokenRequest {
        refresh_token: account.refresh_token.clone(),
    };

    let response = server.post("/auth/refresh", &request).await.unwrap();
    let tokens: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(tokens["refresh_token"], account.refresh_token.as_str());

    // the old session was revoked by the rotation
    let response = server.post("/auth/refresh", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_refresh_is_single_use() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let account = server.register_user().await.unwrap();
    let request = RefreshTokenRequest {
        refresh_token: account.refresh_token.clone(),
    };

    let (first, second) = tokio::join!(
        server.post("/auth/refresh", &request),
        server.post("/auth/refresh", &request)
    );
    let mut statuses = [first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::UNAUTHORIZED]);

    let response = server.post("/auth/refresh", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let account = server.register_user().await.unwrap();

    let response = server
        .post_auth(
            "/auth/logout",
            &account.access_token,
            &json!({"refresh_token": account.refresh_token}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let request = RefreshTokenRequest {
        refresh_token: account.refresh_token,
    };
    let response = server.post("/auth/refresh", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_get_current_user() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let account = server.register_user().await.unwrap();

    let response = server.get_auth("/users/@me", &account.access_token).await.unwrap();
    let user: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(id_of(&user), account.id);
}

#[tokio::test]
async fn test_get_current_user_unauthorized() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let response = server.get("/users/@me").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/users/@me", "garbage").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_update_preferences() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let account = server.register_user().await.unwrap();
    let body = json!({"preferences": {"theme": "dark"}});

    let response = server
        .patch_auth("/users/@me/preferences", &account.access_token, &body)
        .await
        .unwrap();
    let user: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user["preferences"]["theme"], "dark");

    let response = server
        .patch_auth("/users/@me/preferences", &account.access_token, &json!({"preferences": 3}))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let account = server.register_user().await.unwrap();

    let response = server.get_auth("/admin/users", &account.access_token).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_admin_lists_users_with_pagination() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let account = server.register_user().await.unwrap();

    let path = format!("/admin/users?page=1&limit=5&q={}", account.email);
    let response = server.get_auth(&path, &admin.access_token).await.unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(page["total"], 1);
    assert_eq!(page["limit"], 5);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(id_of(&page["items"][0]), account.id);

    let response = server
        .get_auth("/admin/users?limit=500", &admin.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();

    let response = server
        .delete_auth(&format!("/admin/users/{}", admin.id), &admin.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_only_admin_changes_roles() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let account = server.register_user().await.unwrap();
    let other = server.register_user().await.unwrap();
    let path = format!("/admin/users/{}", account.id);

    // owners read themselves and their role is dropped silently
    let response = server.get_auth(&path, &account.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let response = server.get_auth(&path, &other.access_token).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch_auth(&path, &account.access_token, &json!({"role": "admin", "first_name": "Renamed"}))
        .await
        .unwrap();
    let user: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user["first_name"], "Renamed");
    assert_eq!(user["role"], "user");

    let response = server
        .patch_auth(&path, &account.access_token, &json!({"role": "admin"}))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    // agent accounts need an agent record, so this endpoint refuses them
    let response = server
        .patch_auth(&path, &admin.access_token, &json!({"role": "agent"}))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .patch_auth(&path, &admin.access_token, &json!({"role": "admin"}))
        .await
        .unwrap();
    let user: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user["role"], "admin");

    let response = server.patch_auth(&path, &admin.access_token, &json!({})).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_agents_are_not_demoted_through_user_update() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let agent = server.agent(5).await.unwrap();

    let response = server
        .patch_auth(
            &format!("/admin/users/{}", agent.id),
            &admin.access_token,
            &json!({"role": "user"}),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get_auth("/agent", &agent.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_agent_capacity_bounds() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let suffix = unique_suffix();
    let body = json!({
        "first_name": "New",
        "last_name": "Agent",
        "email": format!("agent{suffix}@example.com"),
        "password": "AgentPass1",
        "capacity": 11,
    });

    let response = server.post_auth("/admin/agents", &admin.access_token, &body).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let mut body = body;
    body["capacity"] = json!(4);
    let response = server.post_auth("/admin/agents", &admin.access_token, &body).await.unwrap();
    let agent: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(agent["capacity"], 4);
    assert_eq!(agent["user"]["role"], "agent");
}

#[tokio::test]
async fn test_duplicate_queue_title() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let request = QueueRequest::unique();

    let response = server.post_auth("/admin/queues", &admin.access_token, &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post_auth("/admin/queues", &admin.access_token, &request).await.unwrap();
    assert_error(response, StatusCode::CONFLICT).await.unwrap();

    let response = server.get("/queues").await.unwrap();
    let queues: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(queues.iter().any(|q| q["title"] == request.title.as_str()));
}

// ============================================================================
// Helpdesk Tests
// ============================================================================

#[tokio::test]
async fn test_ticket_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let agent = server.agent(5).await.unwrap();
    let owner = server.register_user().await.unwrap();
    let queue_id = create_queue(&server, &admin).await;

    let ticket_id = open_ticket(&server, &owner, &queue_id).await;
    let path = format!("/tickets/{ticket_id}");

    // first message comes from the owner
    let response = server.get_auth(&path, &owner.access_token).await.unwrap();
    let ticket: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ticket["messages"][0]["sender"], "user");
    assert!(ticket["agent_rating"].is_null());

    // the agent is not assigned yet, so the ticket is hidden
    let response = server.get_auth(&path, &agent.access_token).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();

    let claim = format!("/agent/tickets/{ticket_id}/claim");
    let response = server.post_empty_auth(&claim, &agent.access_token).await.unwrap();
    let claimed: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(claimed["agent_id"].as_str(), agent.agent_id.as_deref());

    let other = server.agent(5).await.unwrap();
    let response = server.post_empty_auth(&claim, &other.access_token).await.unwrap();
    assert_error(response, StatusCode::CONFLICT).await.unwrap();

    let messages = format!("{path}/messages");
    let response = server
        .post_auth(&messages, &agent.access_token, &PostMessageRequest::new("On it"))
        .await
        .unwrap();
    let message: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(message["sender"], "agent");

    // admins read but never post
    let response = server.get_auth(&path, &admin.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    let response = server
        .post_auth(&messages, &admin.access_token, &PostMessageRequest::new("Hi"))
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    // strangers see nothing
    let stranger = server.register_user().await.unwrap();
    let response = server.get_auth(&path, &stranger.access_token).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();

    let close = format!("/agent/tickets/{ticket_id}/close");
    let response = server.post_empty_auth(&close, &agent.access_token).await.unwrap();
    let closed: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(closed["is_closed"], true);

    let response = server.post_empty_auth(&close, &agent.access_token).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth(&messages, &owner.access_token, &PostMessageRequest::new("Thanks"))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_agent_capacity_is_enforced_on_claim() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let agent = server.agent(3).await.unwrap();
    let owner = server.register_user().await.unwrap();
    let queue_id = create_queue(&server, &admin).await;

    for _ in 0..3 {
        let ticket_id = open_ticket(&server, &owner, &queue_id).await;
        let response = server
            .post_empty_auth(&format!("/agent/tickets/{ticket_id}/claim"), &agent.access_token)
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let ticket_id = open_ticket(&server, &owner, &queue_id).await;
    let response = server
        .post_empty_auth(&format!("/agent/tickets/{ticket_id}/claim"), &agent.access_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "CAPACITY_REACHED");

    let response = server.get_auth("/agent", &agent.access_token).await.unwrap();
    let dashboard: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(dashboard["workload"], 3);
    assert_eq!(dashboard["tickets"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_rating_rules() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let agent = server.agent(5).await.unwrap();
    let owner = server.register_user().await.unwrap();
    let queue_id = create_queue(&server, &admin).await;
    let ticket_id = open_ticket(&server, &owner, &queue_id).await;

    let rating = |score: i16| CreateRatingRequest {
        ticket_id: ticket_id.clone(),
        score,
        comment: Some("Great help".to_string()),
    };

    // open and unassigned
    let response = server.post_auth("/ratings", &owner.access_token, &rating(5)).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    server
        .post_empty_auth(&format!("/agent/tickets/{ticket_id}/claim"), &agent.access_token)
        .await
        .unwrap();
    server
        .post_empty_auth(&format!("/agent/tickets/{ticket_id}/close"), &agent.access_token)
        .await
        .unwrap();

    let response = server.post_auth("/ratings", &owner.access_token, &rating(6)).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let stranger = server.register_user().await.unwrap();
    let response = server.post_auth("/ratings", &stranger.access_token, &rating(4)).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.post_auth("/ratings", &owner.access_token, &rating(4)).await.unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created["score"], 4);

    let response = server.post_auth("/ratings", &owner.access_token, &rating(5)).await.unwrap();
    assert_error(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .get_auth(&format!("/tickets/{ticket_id}/rating"), &owner.access_token)
        .await
        .unwrap();
    let stored: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stored["score"], 4);

    let response = server.get_auth("/agent", &agent.access_token).await.unwrap();
    let dashboard: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(dashboard["rating"]["avg"], 4.0);
    assert_eq!(dashboard["rating"]["count"], 1);
}

#[tokio::test]
async fn test_ticket_stream_receives_messages() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let owner = server.register_user().await.unwrap();
    let queue_id = create_queue(&server, &admin).await;
    let ticket_id = open_ticket(&server, &owner, &queue_id).await;

    let url = format!(
        "{}?token={}",
        server.api_url(&format!("/tickets/{ticket_id}/stream")),
        owner.access_token
    );
    let mut stream = server.client.get(url).send().await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);
    assert_eq!(
        stream.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let first = stream.chunk().await.unwrap().unwrap();
    assert!(String::from_utf8_lossy(&first).starts_with("event: ping"));

    server
        .post_auth(
            &format!("/tickets/{ticket_id}/messages"),
            &owner.access_token,
            &PostMessageRequest::new("Any update?"),
        )
        .await
        .unwrap();

    let mut received = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !received.contains("event: message") && tokio::time::Instant::now() < deadline {
        let chunk = stream.chunk().await.unwrap().unwrap();
        received.push_str(&String::from_utf8_lossy(&chunk));
    }
    assert!(received.contains("event: message"));
    assert!(received.contains("Any update?"));
}

#[tokio::test]
async fn test_ticket_stream_requires_visibility() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let owner = server.register_user().await.unwrap();
    let stranger = server.register_user().await.unwrap();
    let queue_id = create_queue(&server, &admin).await;
    let ticket_id = open_ticket(&server, &owner, &queue_id).await;

    let path = format!("/tickets/{ticket_id}/stream");
    let response = server.get(&path).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth(&path, &stranger.access_token).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Kitchen Tests
// ============================================================================

#[tokio::test]
async fn test_recipe_crud_and_authorship() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let author = server.register_user().await.unwrap();
    let other = server.register_user().await.unwrap();
    let suffix = unique_suffix();
    let request = CreateRecipeRequest::with_lines(vec![RecipeLine::named(
        &format!("basil {suffix}"),
        10.0,
        "g",
    )]);

    let response = server.post_auth("/recipes", &author.access_token, &request).await.unwrap();
    let recipe: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/recipes/{}", id_of(&recipe));
    assert_eq!(recipe["ingredients"][0]["ingredient"]["name"], format!("basil {suffix}"));

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let update = json!({
        "title": "Renamed recipe",
        "instructions": "Stir for five minutes.",
        "prep_time": 5,
        "servings": 1,
    });
    let response = server.put_auth(&path, &other.access_token, &update).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.put_auth(&path, &author.access_token, &update).await.unwrap();
    let updated: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated["title"], "Renamed recipe");
    assert_eq!(updated["ingredients"].as_array().map(Vec::len), Some(1));

    let response = server.delete_auth(&path, &author.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&path).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_RECIPE");
}

#[tokio::test]
async fn test_recipe_validation() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let author = server.register_user().await.unwrap();

    let response = server
        .post_auth("/recipes", &author.access_token, &CreateRecipeRequest::with_lines(Vec::new()))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let line = RecipeLine {
        ingredient_id: None,
        custom_name: None,
        amount: 1.0,
        unit: "g".to_string(),
    };
    let response = server
        .post_auth("/recipes", &author.access_token, &CreateRecipeRequest::with_lines(vec![line]))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_recipe_filter_requires_all_ingredients() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let author = server.register_user().await.unwrap();
    let suffix = unique_suffix();
    let flour = format!("flour {suffix}");
    let sugar = format!("sugar {suffix}");

    let both = CreateRecipeRequest::with_lines(vec![
        RecipeLine::named(&flour, 200.0, "g"),
        RecipeLine::named(&sugar, 50.0, "g"),
    ]);
    let response = server.post_auth("/recipes", &author.access_token, &both).await.unwrap();
    let cake: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    let flour_only = CreateRecipeRequest::with_lines(vec![RecipeLine::named(&flour, 300.0, "g")]);
    let response = server.post_auth("/recipes", &author.access_token, &flour_only).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let ids: Vec<String> = cake["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| id_of(&line["ingredient"]))
        .collect();

    let response = server
        .get(&format!("/recipes?ingredient_ids={}", ids.join(",")))
        .await
        .unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["pages"], 1);
    assert_eq!(page["limit"], 10);
    assert_eq!(id_of(&page["items"][0]), id_of(&cake));
}

#[tokio::test]
async fn test_meal_plan_summary_and_shopping() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let cook = server.register_user().await.unwrap();
    let suffix = unique_suffix();
    let egg = format!("egg {suffix}");

    let mut recipe_ids = Vec::new();
    for amount in [2.0, 3.0] {
        let request = CreateRecipeRequest::with_lines(vec![RecipeLine::named(&egg, amount, "pcs")]);
        let response = server.post_auth("/recipes", &cook.access_token, &request).await.unwrap();
        let recipe: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
        recipe_ids.push(id_of(&recipe));
    }

    let date = "2030-01-15";
    for (recipe_id, meal_type) in recipe_ids.iter().zip(["breakfast", "dinner"]) {
        let request = CreateMealPlanRequest {
            recipe_id: recipe_id.clone(),
            date: date.to_string(),
            meal_type: meal_type.to_string(),
        };
        let response = server.post_auth("/mealplan", &cook.access_token, &request).await.unwrap();
        let entry: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(id_of(&entry["recipe"]), *recipe_id);
    }

    let duplicate = CreateMealPlanRequest {
        recipe_id: recipe_ids[0].clone(),
        date: date.to_string(),
        meal_type: "breakfast".to_string(),
    };
    let response = server.post_auth("/mealplan", &cook.access_token, &duplicate).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "MEAL_ALREADY_EXISTS");

    let response = server
        .get_auth(&format!("/mealplan?date={date}"), &cook.access_token)
        .await
        .unwrap();
    let entries: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["meal_type"], "breakfast");

    let response = server
        .get_auth(&format!("/mealplan/summary?date={date}"), &cook.access_token)
        .await
        .unwrap();
    let summary: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0]["name"], egg.as_str());
    assert_eq!(summary[0]["amount"], 5.0);

    let response = server
        .get_auth(&format!("/shopping?date={date}"), &cook.access_token)
        .await
        .unwrap();
    let items: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(items[0]["is_bought"], false);

    // entries belong to their planner
    let other = server.register_user().await.unwrap();
    let entry_id = id_of(&entries[0]);
    let response = server
        .delete_auth(&format!("/mealplan/{entry_id}"), &other.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .delete_auth(&format!("/mealplan/{entry_id}"), &cook.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_catalogue_is_public() {
    if !check_test_env().await {
        return;
    }

    let server = server().await;
    let admin = server.admin().await.unwrap();
    let name = format!("spicy {}", unique_suffix());

    let response = server
        .post_auth("/admin/tags", &admin.access_token, &json!({"name": name, "kind": "taste"}))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.get("/tags").await.unwrap();
    let tags: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(tags.iter().any(|tag| tag["name"] == name.as_str()));

    let response = server.get("/ingredients").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}
