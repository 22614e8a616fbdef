use axum::{
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod campaigns;
pub mod contributions;
pub mod events;
pub mod health;
pub mod images;
pub mod milestones;
pub mod profile;
pub mod services;
pub mod tiers;

/// `?limit=&offset=` shared by paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?address=` used by the wallet-scoped endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

/// Build the full application router: campaigns, milestones, funding, events, catalog and profiles.
pub fn build_router(state: AppState) -> Router {
    let meta = Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::detailed));

    let campaigns = Router::new()
        .route("/campaigns", post(campaigns::create).get(campaigns::list))
        .route("/campaigns/creator", get(campaigns::by_creator))
        .route("/voting-campaigns", get(campaigns::voting))
        .route("/campaign", get(campaigns::details))
        .route("/upload-image", post(images::upload))
        .route("/add-tier", post(tiers::add))
        .route("/tiers", get(tiers::list));

    let milestones = Router::new()
        .route("/upload-milestone", post(milestones::create))
        .route("/milestones", get(milestones::list))
        .route("/campaigns/:object_id/milestones/:milestone_id/vote-result", put(milestones::vote_result))
        .route("/campaigns/:object_id/milestones/:milestone_id/claimed", put(milestones::claimed))
        .route("/campaigns/:object_id/milestones/:milestone_id/status", put(milestones::status));

    let contributions = Router::new()
        .route("/contributions", post(contributions::create).get(contributions::list))
        .route("/contributions/wallet/:address", get(contributions::by_wallet))
        .route("/contributions/campaign/:id", get(contributions::by_campaign))
        .route("/contributions/event/:id", get(contributions::by_event))
        .route("/contributions/campaigns", get(contributions::all_campaigns))
        .route("/contributions/events", get(contributions::all_events))
        .route("/contributions/addresses", get(contributions::addresses));

    let events = Router::new()
        .route("/events", post(events::create).get(events::list))
        .route("/events/:id", get(events::details))
        .route("/services", post(services::create).get(services::list))
        .route("/services/:id", get(services::get_one))
        .route("/services/:id/update", post(services::update))
        .route("/services/:id/delete", post(services::delete));

    let profiles = Router::new()
        .route("/profile", post(profile::create))
        .route("/profile/wallet/:address", get(profile::by_wallet).put(profile::update))
        .route("/profile/email/:email", get(profile::by_email))
        .route("/profile/me", get(profile::me))
        .route("/profile/me/created-campaigns", get(profile::my_campaigns))
        .route("/profile/me/contributions", get(profile::my_contributions));

    meta.merge(campaigns)
        .merge(milestones)
        .merge(contributions)
        .merge(events)
        .merge(profiles)
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
