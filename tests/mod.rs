
use anyhow::Result;
use tokio::net::TcpListener;
use webhook_relay::{
    api::{AppState, build_router},
    config::Config,
};

pub const TEST_SECRET: &str = "relay-test-secret";
pub const TEST_TOKEN: &str = "ghp_test_token";
pub const DISPATCH_PATH: &str = "/repos/OliAjonjoli/redcudi.org-astro/dispatches";

pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Config pointing the relay at a mock GitHub API, plus any overrides.
pub fn test_config(github_api_url: &str, overrides: &[(&str, &str)]) -> Config {
    let mut pairs = vars(&[
        ("RELAY_SECRET", TEST_SECRET),
        ("GH_PAT", TEST_TOKEN),
        ("GITHUB_API_URL", github_api_url),
    ]);
    pairs.extend(vars(overrides));

    Config::from_vars(pairs).expect("test config should be valid")
}

pub struct TestRelay {
    pub url: String,
    pub state: AppState,
}

/// Serves the relay on an ephemeral port for the lifetime of the test.
pub async fn spawn_relay(config: Config) -> Result<TestRelay> {
    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let app = build_router(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestRelay {
        url: format!("http://{}", addr),
        state,
    })
}

/// A local address with nothing listening on it.
pub fn unreachable_url() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

pub fn strapi_body(singular_name: &str, action: &str) -> serde_json::Value {
    serde_json::json!({
        "event": {
            "action": action,
            "model": {
                "singularName": singular_name,
                "uid": format!("api::{0}.{0}", singular_name),
            }
        }
    })
}
