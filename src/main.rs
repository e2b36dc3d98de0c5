use anyhow::{Context, Result};
use igdb_mirror::api::{AppState, ApiServer};
use igdb_mirror::config::Config;
use igdb_mirror::facade::Facade;
use igdb_mirror::matcher::Matcher;
use igdb_mirror::mirror::Mirror;
use igdb_mirror::models::{AlternativeName, ExternalGame, Game, GameLocalization, PassthroughEntity};
use igdb_mirror::telemetry;
use igdb_mirror::upstream::UpstreamClient;
use igdb_mirror::webhooks::WebhookIngress;
use mongodb::Client;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init("info")?;

    let config = Config::from_env()?;

    let mongo_client = Client::with_uri_str(&config.mongo_connection_string)
        .await
        .context("connecting to MongoDB")?;
    let db = mongo_client.database(&config.mongo_database_name);

    let upstream = Arc::new(UpstreamClient::new(&config));

    let games = Arc::new(Mirror::<Game>::new(
        &db,
        upstream.clone(),
        config.webhook_root_address.clone(),
        config.webhook_secret.clone(),
    ));
    let alternative_names = Arc::new(Mirror::<AlternativeName>::new(
        &db,
        upstream.clone(),
        config.webhook_root_address.clone(),
        config.webhook_secret.clone(),
    ));
    let external_games = Arc::new(Mirror::<ExternalGame>::new(
        &db,
        upstream.clone(),
        config.webhook_root_address.clone(),
        config.webhook_secret.clone(),
    ));
    let game_localizations = Arc::new(Mirror::<GameLocalization>::new(
        &db,
        upstream.clone(),
        config.webhook_root_address.clone(),
        config.webhook_secret.clone(),
    ));
    let companies = Arc::new(Mirror::<PassthroughEntity>::new(
        &db,
        upstream.clone(),
        config.webhook_root_address.clone(),
        config.webhook_secret.clone(),
    ));

    let matcher = Matcher::new(games.clone(), alternative_names.clone());
    let facade = Facade::new(games.clone(), external_games.clone(), matcher);

    let webhooks = WebhookIngress {
        configured_secret: config.webhook_secret.clone().unwrap_or_default(),
        games: games.clone(),
        alternative_names: alternative_names.clone(),
        external_games: external_games.clone(),
        game_localizations: game_localizations.clone(),
        companies: companies.clone(),
    };

    let state = AppState { facade, webhooks };

    info!(
        host = %config.api_host,
        port = config.api_port,
        "igdb-mirror starting"
    );
    ApiServer::new(config.api_host.clone(), config.api_port)
        .run(state)
        .await
}
