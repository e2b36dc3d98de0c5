use anyhow::{Context, Result};
use std::env;

/// Process-wide configuration, loaded once at startup.
///
/// Webhook fields are optional: per spec, missing webhook configuration is
/// only a fatal error when `ConfigureWebhooks` actually runs, not at boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_base_url: String,
    pub upstream_auth_token: String,
    pub webhook_root_address: Option<String>,
    pub webhook_secret: Option<String>,
    pub mongo_connection_string: String,
    pub mongo_database_name: String,
    pub api_host: String,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        crate::env_boot::ensure_dotenv();

        let upstream_base_url =
            env::var("UpstreamBaseUrl").context("missing env: UpstreamBaseUrl")?;
        let upstream_auth_token =
            env::var("UpstreamAuthToken").context("missing env: UpstreamAuthToken")?;
        let webhook_root_address = env::var("WebHookRootAddress").ok();
        let webhook_secret = env::var("WebHookSecret").ok();
        let mongo_connection_string =
            env::var("MongoConnectionString").context("missing env: MongoConnectionString")?;
        let mongo_database_name =
            env::var("MongoDatabaseName").context("missing env: MongoDatabaseName")?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("invalid API_PORT")?;

        Ok(Self {
            upstream_base_url,
            upstream_auth_token,
            webhook_root_address,
            webhook_secret,
            mongo_connection_string,
            mongo_database_name,
            api_host,
            api_port,
        })
    }
}
