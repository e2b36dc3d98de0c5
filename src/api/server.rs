//! API server bootstrap using `actix-web`, in the teacher's `ApiServer`
//! shape: a thin struct holding bind settings, constructed from `Config`,
//! wrapping a pre-built `AppState` at `run` time.

use crate::api::{middleware, routes, AppState};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};

pub struct ApiServer {
    pub host: String,
    pub port: u16,
}

impl ApiServer {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    pub async fn run(self, state: AppState) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);
        tracing::info!(host = %self.host, port = %self.port, "starting igdb-mirror API server");

        let state_data = web::Data::new(state);

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors("*");

            App::new()
                .app_data(state_data.clone())
                .wrap(logger)
                .wrap(compress)
                .wrap(cors)
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)
        .with_context(|| format!("failed to bind to {bind_addr}"))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
