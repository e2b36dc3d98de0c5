//! HTTP surface for the IGDB mirror (spec §6): thin `actix-web` handlers
//! over the query façade and webhook ingress, nothing else.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use crate::facade::Facade;
use crate::webhooks::WebhookIngress;

pub use server::ApiServer;

/// Shared, `actix-web`-managed application state: one façade, one webhook
/// ingress, built once at startup and cloned into every worker via `Arc`.
pub struct AppState {
    pub facade: Facade,
    pub webhooks: WebhookIngress,
}
