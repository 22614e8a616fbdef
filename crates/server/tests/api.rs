use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database};
use serde_json::{json, Value};
use tower::ServiceExt;

use server::{routes, AppState};

async fn app() -> anyhow::Result<Router> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(routes::build_router(AppState::new(db, "test")))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let req = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(b.to_string()))?,
        None => req.body(Body::empty())?,
    };
    let res = app.clone().oneshot(req).await?;
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn get(app: &Router, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    call(app, Method::GET, uri, None).await
}

fn campaign_body(object_id: &str, goal: f64) -> Value {
    json!({
        "creator_address": "0xcreator",
        "on_chain_object_id": object_id,
        "title": "Solar Kiosk",
        "short_description": "Off-grid charging",
        "category": "energy",
        "goal_amount": goal,
        "duration_days": 30,
        "reward_type": "nft",
        "story_sections": [{ "title": "Why", "content": "Power for all" }],
        "roadmap_phases": [{ "title": "Prototype", "timeline": "Q1", "state": "in-progress" }],
        "team_members": [{ "name": "Ana", "role": "lead", "contact_info": { "x": "@ana" } }],
        "gallery_images": [{ "image_url": "https://img.example.com/k.png", "is_cover": true }]
    })
}

fn milestone_body(object_id: &str, milestone_id: &str) -> Value {
    json!({
        "objectId": object_id,
        "milestoneId": milestone_id,
        "title": "Build prototype",
        "deliverables": ["schematics", "demo video"],
        "amount": 250.0,
        "currency": "USD",
        "votingDurationDays": 7
    })
}

#[tokio::test]
async fn welcome_and_health() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, body) = get(&app, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to FundX backend!");

    let (_, body) = get(&app, "/health").await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert!(body.get("database").is_none());

    let (_, body) = get(&app, "/health/detailed").await?;
    assert_eq!(body["database"], "up");
    Ok(())
}

#[tokio::test]
async fn campaign_create_list_and_details() -> anyhow::Result<()> {
    let app = app().await?;
    let (status, body) = call(&app, Method::POST, "/campaigns", Some(campaign_body("obj-1", 1000.0))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_success"], true);
    let id = body["data"]["campaign_id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());

    let (status, body) = get(&app, "/campaigns").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["images"].as_array().map(Vec::len), Some(1));

    let (_, by_uuid) = get(&app, &format!("/campaign?id={id}")).await?;
    let (_, by_object) = get(&app, "/campaign?id=obj-1").await?;
    assert_eq!(by_uuid["data"]["id"], by_object["data"]["id"]);
    assert_eq!(by_uuid["data"]["title"], "Solar Kiosk");
    assert_eq!(by_uuid["data"]["currency"], "USD");
    assert_eq!(by_uuid["data"]["story_sections"].as_array().map(Vec::len), Some(1));
    assert_eq!(by_uuid["data"]["team_members"].as_array().map(Vec::len), Some(1));

    let (_, mine) = get(&app, "/campaigns/creator?creator=0xcreator").await?;
    assert_eq!(mine["data"].as_array().map(Vec::len), Some(1));

    let image = json!({ "campaignId": "obj-1", "imgId": "blob-42", "type": "gallery" });
    let (status, body) = call(&app, Method::POST, "/upload-image", Some(image)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_success"], true);
    assert_eq!(body["data"]["is_cover"], false);
    Ok(())
}

#[tokio::test]
async fn bad_input_is_rejected_with_envelope() -> anyhow::Result<()> {
    let app = app().await?;

    let mut invalid = campaign_body("obj-bad", 1000.0);
    invalid["goal_amount"] = json!(0);
    let (status, body) = call(&app, Method::POST, "/campaigns", Some(invalid)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["is_success"], false);
    assert!(body["error"].is_string());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/campaigns")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let res = app.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/campaigns?limit=abc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/campaign").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/milestones").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/profile/me").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/campaign?id=missing").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["is_success"], false);
    Ok(())
}

#[tokio::test]
async fn out_of_range_schedules_are_rejected_with_envelope() -> anyhow::Result<()> {
    let app = app().await?;

    let mut endless = campaign_body("obj-endless", 100.0);
    endless["duration_days"] = json!(2_147_483_647);
    let (status, body) = call(&app, Method::POST, "/campaigns", Some(endless)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["is_success"], false);
    assert!(body["error"].is_string());
    let (status, _) = get(&app, "/campaign?id=obj-endless").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    call(&app, Method::POST, "/campaigns", Some(campaign_body("obj-s", 100.0))).await?;
    let mut far_vote = milestone_body("obj-s", "m1");
    far_vote["votingDurationDays"] = json!(1_000_000_000_i64);
    let (status, body) = call(&app, Method::POST, "/upload-milestone", Some(far_vote)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["is_success"], false);
    assert!(body["error"].is_string());
    let (_, listed) = get(&app, "/milestones?id=obj-s").await?;
    assert_eq!(listed["data"]["milestones"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn running_totals_stay_in_range() -> anyhow::Result<()> {
    let app = app().await?;
    call(&app, Method::POST, "/campaigns", Some(campaign_body("obj-r", 100.0))).await?;
    let pay = |tx: &str| {
        json!({
            "campaignId": "obj-r",
            "walletAddress": "0xwhale",
            "amount": 1e308,
            "txHash": tx,
            "currency": "USD"
        })
    };
    let (status, _) = call(&app, Method::POST, "/contributions", Some(pay("0xbig1"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&app, Method::POST, "/contributions", Some(pay("0xbig2"))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["is_success"], false);
    let (_, details) = get(&app, "/campaign?id=obj-r").await?;
    assert_eq!(details["data"]["current_amount"], 1e308);

    call(&app, Method::POST, "/upload-milestone", Some(milestone_body("obj-r", "m1"))).await?;
    let base = "/campaigns/obj-r/milestones/m1";
    call(&app, Method::PUT, &format!("{base}/status"), Some(json!({ "status": "in-voting" }))).await?;
    let (status, _) = call(&app, Method::PUT, &format!("{base}/vote-result"), Some(json!({ "voteResult": 5 }))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        call(&app, Method::PUT, &format!("{base}/vote-result"), Some(json!({ "voteResult": i64::MAX }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["is_success"], false);
    // beyond i64 never reaches the service
    let req = Request::builder()
        .method(Method::PUT)
        .uri(format!("{base}/vote-result"))
        .header("content-type", "application/json")
        .body(Body::from(r#"{"voteResult": 100000000000000000000000}"#))?;
    let res = app.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::PUT, &format!("{base}/vote-result"), Some(json!({ "voteResult": 1 }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_vote_result"], 6);
    Ok(())
}

#[tokio::test]
async fn pagination_bounds_the_listing() -> anyhow::Result<()> {
    let app = app().await?;
    for i in 0..3 {
        let (status, _) = call(&app, Method::POST, "/campaigns", Some(campaign_body(&format!("obj-{i}"), 100.0))).await?;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, body) = get(&app, "/campaigns?limit=2&offset=0").await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    let (_, body) = get(&app, "/campaigns?limit=2&offset=2").await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    let (_, body) = get(&app, "/campaigns?limit=1000").await?;
    assert_eq!(body["limit"], 100);
    Ok(())
}

#[tokio::test]
async fn contributions_move_amounts_and_reject_duplicates() -> anyhow::Result<()> {
    let app = app().await?;
    call(&app, Method::POST, "/campaigns", Some(campaign_body("obj-c", 100.0))).await?;
    let (status, _) = call(
        &app,
        Method::POST,
        "/add-tier",
        Some(json!({ "campaign_id": "obj-c", "tier": "gold", "limit": 1 })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let contribution = json!({
        "campaignId": "obj-c",
        "walletAddress": "0xfan",
        "amount": 40.0,
        "txHash": "0xtx1",
        "tierType": "gold",
        "currency": "USD"
    });
    let (status, body) = call(&app, Method::POST, "/contributions", Some(contribution.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["campaign_current_amount"], 40.0);

    let (status, _) = call(&app, Method::POST, "/contributions", Some(contribution)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let full_tier = json!({
        "campaignId": "obj-c",
        "walletAddress": "0xsecond",
        "amount": 5.0,
        "txHash": "0xtx2",
        "tierType": "gold",
        "currency": "USD"
    });
    let (status, _) = call(&app, Method::POST, "/contributions", Some(full_tier)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, details) = get(&app, "/campaign?id=obj-c").await?;
    assert_eq!(details["data"]["current_amount"], 40.0);
    assert_eq!(details["data"]["tiers"][0]["current"], 1);

    let (_, wallet) = get(&app, "/contributions?address=0xfan").await?;
    assert_eq!(wallet["total_contributed"], 40.0);
    assert_eq!(wallet["data"][0]["campaign"]["on_chain_object_id"], "obj-c");

    let (_, addresses) = get(&app, "/contributions/addresses?campaign_id=obj-c").await?;
    assert_eq!(addresses["data"], json!(["0xfan"]));

    let (_, stats) = get(&app, "/profile/me?address=0xfan").await?;
    assert_eq!(stats["data"]["total_contributions"], 1);
    assert_eq!(stats["data"]["total_contribution_amount"], 40.0);
    Ok(())
}

#[tokio::test]
async fn contribution_needs_exactly_one_target() -> anyhow::Result<()> {
    let app = app().await?;
    let neither = json!({ "walletAddress": "0xa", "amount": 1.0, "txHash": "0xt", "currency": "USD" });
    let (status, _) = call(&app, Method::POST, "/contributions", Some(neither)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let both = json!({
        "campaignId": "obj-x",
        "eventId": "6f1c2b1e-8a4e-4c1a-9d6e-2f4b7a9c0d11",
        "walletAddress": "0xa",
        "amount": 1.0,
        "txHash": "0xt",
        "currency": "USD"
    });
    let (status, _) = call(&app, Method::POST, "/contributions", Some(both)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn milestone_gates_follow_status() -> anyhow::Result<()> {
    let app = app().await?;
    call(&app, Method::POST, "/campaigns", Some(campaign_body("obj-m", 500.0))).await?;
    let (status, body) = call(&app, Method::POST, "/upload-milestone", Some(milestone_body("obj-m", "m1"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");

    let vote = Some(json!({ "voteResult": 3 }));
    let base = "/campaigns/obj-m/milestones/m1";

    let (status, _) = call(&app, Method::PUT, &format!("{base}/vote-result"), vote.clone()).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&app, Method::PUT, &format!("{base}/status"), Some(json!({ "status": "in-voting" }))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::PUT, &format!("{base}/vote-result"), vote.clone()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_vote_result"], 3);
    let (_, body) = call(&app, Method::PUT, &format!("{base}/vote-result"), vote).await?;
    assert_eq!(body["new_vote_result"], 6);

    let (status, _) = call(&app, Method::PUT, &format!("{base}/claimed"), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    call(&app, Method::PUT, &format!("{base}/status"), Some(json!({ "status": "approved" }))).await?;
    let (status, body) = call(&app, Method::PUT, &format!("{base}/claimed"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_claimed"], true);
    assert_eq!(body["data"]["status"], "claimed");

    let (status, _) = call(&app, Method::PUT, "/campaigns/obj-m/milestones/nope/claimed", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = get(&app, "/milestones?id=obj-m").await?;
    assert_eq!(listed["data"]["object_id"], "obj-m");
    assert_eq!(listed["data"]["milestones"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn voting_campaigns_need_completion_and_open_vote() -> anyhow::Result<()> {
    let app = app().await?;
    call(&app, Method::POST, "/campaigns", Some(campaign_body("obj-v", 50.0))).await?;
    call(&app, Method::POST, "/upload-milestone", Some(milestone_body("obj-v", "m1"))).await?;
    call(
        &app,
        Method::PUT,
        "/campaigns/obj-v/milestones/m1/status",
        Some(json!({ "status": "in-voting" })),
    )
    .await?;

    let (_, body) = get(&app, "/voting-campaigns").await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let funded = json!({
        "campaignId": "obj-v",
        "walletAddress": "0xwhale",
        "amount": 50.0,
        "txHash": "0xbig",
        "currency": "USD"
    });
    call(&app, Method::POST, "/contributions", Some(funded)).await?;

    let (_, body) = get(&app, "/voting-campaigns").await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["status"], "completed");
    assert_eq!(body["data"][0]["milestone"]["on_chain_milestone_id"], "m1");
    Ok(())
}

#[tokio::test]
async fn services_and_events() -> anyhow::Result<()> {
    let app = app().await?;
    let svc = json!({ "id": "catering", "name": "Catering", "base_cost": 200.0 });
    let (status, _) = call(&app, Method::POST, "/services", Some(svc.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call(&app, Method::POST, "/services", Some(svc)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = call(&app, Method::POST, "/services/catering/update", Some(json!({ "popular": true }))).await?;
    assert_eq!(body["data"]["popular"], true);

    let (_, profile) = call(&app, Method::POST, "/profile", Some(json!({ "walletAddress": "0xhost" }))).await?;
    let creator_id = profile["data"]["id"].clone();

    let event = json!({
        "creator_id": creator_id,
        "name": "Hack Night",
        "start_time": "2030-05-01T18:00:00Z",
        "end_time": "2030-05-01T23:00:00Z",
        "funding_deadline": "2030-04-20T00:00:00Z",
        "timezone": "UTC",
        "target_amount": 1000.0,
        "reward_type": "ticket",
        "milestones": [{ "title": "Venue", "funding_goal": 400.0 }],
        "services": ["catering"],
        "gallery_images": [{ "image_url": "https://img.example.com/e.png", "is_cover": true }]
    });
    let (status, body) = call(&app, Method::POST, "/events", Some(event)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = body["data"]["event_id"].as_str().unwrap_or_default().to_string();

    let (_, details) = get(&app, &format!("/events/{event_id}")).await?;
    assert_eq!(details["data"]["services"][0]["id"], "catering");
    assert_eq!(details["data"]["milestones"].as_array().map(Vec::len), Some(1));

    let ticket = json!({
        "eventId": event_id,
        "walletAddress": "0xguest",
        "amount": 25.0,
        "txHash": "0xticket",
        "currency": "USD"
    });
    let (_, receipt) = call(&app, Method::POST, "/contributions", Some(ticket)).await?;
    assert_eq!(receipt["data"]["event_amount_raised"], 25.0);
    let (_, by_event) = get(&app, &format!("/contributions/event/{event_id}")).await?;
    assert_eq!(by_event["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = get(&app, "/events/not-a-uuid").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/services/ghost/delete", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn profile_lifecycle() -> anyhow::Result<()> {
    let app = app().await?;
    let input = json!({ "walletAddress": "0xalice", "username": "alice", "email": "alice@example.com" });
    let (status, body) = call(&app, Method::POST, "/profile", Some(input.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "user");

    let (status, _) = call(&app, Method::POST, "/profile", Some(input)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, by_email) = get(&app, "/profile/email/alice@example.com").await?;
    assert_eq!(by_email["data"]["wallet_address"], "0xalice");

    let (status, body) = call(&app, Method::PUT, "/profile/wallet/0xalice", Some(json!({ "bio": "builder" }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bio"], "builder");
    assert_eq!(body["data"]["username"], "alice");

    let (status, _) = get(&app, "/profile/wallet/0xnobody").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = get(&app, "/profile/me?address=0xfresh").await?;
    assert_eq!(stats["data"]["total_campaigns_created"], 0);
    assert_eq!(stats["data"]["total_contribution_amount"], 0.0);

    let (_, created) = get(&app, "/profile/me/created-campaigns?address=0xalice").await?;
    assert_eq!(created["data"], json!([]));
    Ok(())
}
