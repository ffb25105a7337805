#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use novaprofile_api::auth::{self, TokenPair};
use novaprofile_api::config::{AppConfig, SecurityConfig};
use reqwest::StatusCode;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@novaprofile.io";
pub const ADMIN_PASSWORD: &str = "admin-pass";

pub const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/org.json");

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Fixture mode: no database needed
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_novaprofile-api"));
        cmd.env("NOVA_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("NOVA_FIXTURE", FIXTURE)
            .env("JWT_SECRET", JWT_SECRET)
            .env("ADMIN_EMAIL", ADMIN_EMAIL)
            .env("ADMIN_PASSWORD", ADMIN_PASSWORD)
            .env_remove("DATABASE_URL")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Security settings matching the spawned server
pub fn security() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: JWT_SECRET.to_string(),
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        ..AppConfig::development().security
    }
}

/// Config for in-process routers
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security = security();
    config
}

/// Token pair for `email`, signed with the test secret
pub fn tokens_for(email: &str) -> TokenPair {
    auth::issue_pair(email, &security()).expect("issue test tokens")
}

pub fn bearer(email: &str) -> String {
    format!("Bearer {}", tokens_for(email).access)
}
