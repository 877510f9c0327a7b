use std::path;

use anyhow::Result;
use once_cell::sync::Lazy;
use tokio::fs;
use tokio::sync::Mutex;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

// Config is global, loads must not interleave.
static LOAD_LOCK: Lazy<Mutex<()>> = Lazy::new(|| return Mutex::new(()));

async fn write_config(content: &str) -> Result<path::PathBuf> {
    let config_path =
        std::env::temp_dir().join(format!("scribe-config-{}.toml", uuid::Uuid::new_v4()));
    fs::write(&config_path, content).await?;

    return Ok(config_path);
}

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    insta::assert_snapshot!(res, @r###"
    # URL of the agent orchestration server.
    server-url = "http://0.0.0.0:8080"

    # Name of the agent app served by the orchestration server.
    app-name = "multi_tool_agent"

    # Time to wait in milliseconds for a research turn to complete. 0 disables the timeout.
    request-timeout = 300000

    # Time to wait in milliseconds before timing out when doing a healthcheck for the orchestration server.
    health-check-timeout = 1000

    # Format of newly created session ids. [possible values: timestamp, uuid]
    session-id-style = "timestamp"

    # Start a session as soon as the chat opens. [possible values: true, false]
    auto-session = false

    # Your user name displayed in all chat bubbles.
    # username = ""
    "###);
}

#[tokio::test]
async fn it_loads_config_from_file_with_cli_precedence() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let config_path = write_config(
        r#"
server-url = "http://agents.internal:9000"
app-name = "research_agent"
request-timeout = 0
session-id-style = "uuid"
auto-session = true
"#,
    )
    .await?;
    let config_path_str = config_path.to_string_lossy().to_string();

    let matches = cli::build().try_get_matches_from(vec![
        "scribe",
        "chat",
        "-c",
        &config_path_str,
        "--app-name",
        "multi_tool_agent",
    ])?;
    Config::load(cli::build(), vec![&matches]).await?;

    assert_eq!(
        Config::get(ConfigKey::ServerURL),
        "http://agents.internal:9000"
    );
    assert_eq!(Config::get(ConfigKey::AppName), "multi_tool_agent");
    assert_eq!(Config::get(ConfigKey::RequestTimeout), "0");
    assert_eq!(Config::get(ConfigKey::SessionIdStyle), "uuid");
    assert!(Config::get_bool(ConfigKey::AutoSession));
    assert_eq!(Config::get(ConfigKey::HealthCheckTimeout), "1000");

    fs::remove_file(config_path).await?;
    return Ok(());
}

#[tokio::test]
async fn it_loads_defaults_without_a_config_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let matches = cli::build().try_get_matches_from(vec![
        "scribe",
        "-c",
        "/nonexistent/scribe/config.toml",
    ])?;
    Config::load(cli::build(), vec![&matches]).await?;

    assert_eq!(Config::get(ConfigKey::ServerURL), "http://0.0.0.0:8080");
    assert_eq!(Config::get(ConfigKey::AppName), "multi_tool_agent");
    assert!(!Config::get_bool(ConfigKey::AutoSession));

    return Ok(());
}

#[tokio::test]
async fn it_fails_to_load_invalid_values() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let config_path = write_config(r#"session-id-style = "sequential""#).await?;
    let config_path_str = config_path.to_string_lossy().to_string();

    let matches = cli::build().try_get_matches_from(vec!["scribe", "-c", &config_path_str])?;
    let res = Config::load(cli::build(), vec![&matches]).await;

    let err = res.unwrap_err().to_string();
    assert!(err.contains("invalid value for key 'session-id-style': sequential"));
    assert!(err.contains("Possible values are: timestamp, uuid"));

    fs::remove_file(config_path).await?;
    return Ok(());
}
