//! Test server and response assertions

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use campus_api::{create_app, create_app_state, serve};
use campus_common::{hash_password, AppConfig};
use campus_core::{
    Agent, AgentLevel, AgentRepository, Role, SnowflakeGenerator, User, UserRepository,
};
use campus_db::{PgAgentRepository, PgPool, PgUserRepository};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{unique_suffix, Account, LoginRequest, TEST_PASSWORD};

pub const API_PREFIX: &str = "/api/v1";

/// Ids for rows the tests insert directly; a worker id the server never uses
fn id_generator() -> &'static SnowflakeGenerator {
    static GENERATOR: OnceLock<SnowflakeGenerator> = OnceLock::new();
    GENERATOR.get_or_init(|| SnowflakeGenerator::new(1021))
}

/// Running API server bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pool: PgPool,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let pool = state.service_context().pool().clone();
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            pool,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of an API route, e.g. `api_url("/queues")`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url())
    }

    /// GET outside the API prefix (health probes)
    pub async fn get_root(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(format!("{}{path}", self.base_url())).send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.api_url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.get(self.api_url(path)).bearer_auth(token)).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        send(self.client.post(self.api_url(path)).json(body)).await
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        send(self.client.post(self.api_url(path)).bearer_auth(token).json(body)).await
    }

    /// POST without a body
    pub async fn post_empty_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.post(self.api_url(path)).bearer_auth(token)).await
    }

    pub async fn patch_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        send(self.client.patch(self.api_url(path)).bearer_auth(token).json(body)).await
    }

    pub async fn put_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        send(self.client.put(self.api_url(path)).bearer_auth(token).json(body)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.delete(self.api_url(path)).bearer_auth(token)).await
    }

    /// Register a fresh `user` account through the API
    pub async fn register_user(&self) -> Result<Account> {
        let request = crate::fixtures::RegisterRequest::unique();
        let response = self.post("/auth/register", &request).await?;
        let data: Value = assert_json(response, StatusCode::CREATED).await?;
        Account::from_auth(&data)
    }

    /// Insert an admin directly and log in
    pub async fn admin(&self) -> Result<Account> {
        let user = new_user(Role::Admin);
        PgUserRepository::new(self.pool.clone())
            .create(&user, &hash_password(TEST_PASSWORD)?)
            .await?;
        self.login(&user.email).await
    }

    /// Insert an agent with the given capacity and log in
    pub async fn agent(&self, capacity: i32) -> Result<Account> {
        let user = new_user(Role::Agent);
        let agent = Agent::new(id_generator().generate(), user.id, AgentLevel::Middle, capacity);
        PgAgentRepository::new(self.pool.clone())
            .create_with_user(&user, &hash_password(TEST_PASSWORD)?, &agent)
            .await?;

        let mut account = self.login(&user.email).await?;
        account.agent_id = Some(agent.id.to_string());
        Ok(account)
    }

    pub async fn login(&self, email: &str) -> Result<Account> {
        let request = LoginRequest {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        };
        let response = self.post("/auth/login", &request).await?;
        let data: Value = assert_json(response, StatusCode::OK).await?;
        Account::from_auth(&data)
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    Ok(request.send().await?)
}

fn new_user(role: Role) -> User {
    let suffix = unique_suffix();
    User::new(
        id_generator().generate(),
        "Test".to_string(),
        format!("{role}{suffix}"),
        format!("{role}{suffix}@campus.test"),
        role,
    )
}

/// Environment configuration with a rate limit high enough for the test suite
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.rate_limit.requests_per_second = 10_000;
    config.rate_limit.burst = 10_000;
    config.sse.keep_alive_secs = 1;
    Ok(config)
}

/// Whether the backing services are configured
pub async fn check_test_env() -> bool {
    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert the status and return the envelope's `data`
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected_status {
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }

    let envelope: Value = serde_json::from_str(&body)?;
    if envelope["status"] != "ok" {
        anyhow::bail!("Expected success envelope, got: {body}");
    }
    Ok(serde_json::from_value(envelope["data"].clone())?)
}

/// Assert an error status and return the error `code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected_status {
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }

    let envelope: Value = serde_json::from_str(&body)?;
    if envelope["status"] != "error" {
        anyhow::bail!("Expected error envelope, got: {body}");
    }
    Ok(envelope["code"].as_str().unwrap_or_default().to_string())
}

pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// String id out of a JSON object
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap_or_default().to_string()
}
