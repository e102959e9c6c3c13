mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use service::auth::domain::Role;

use support::{build_app, profile_body};

fn revenue_stats(latest: f64) -> Value {
    json!({"revenue": [{"year": 2024, "amount": latest}, {"year": 2023, "amount": latest / 2.0}], "cagr": 5.0})
}

#[tokio::test]
async fn test_second_post_updates_instead_of_duplicating() -> anyhow::Result<()> {
    let app = build_app();
    let (user, token) = app.user_with_token("Owner", Role::Business).await?;

    let (status, first) = app.send("POST", "/api/business/profile", Some(&token), Some(profile_body("Acme"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = app.send("POST", "/api/business/profile", Some(&token), Some(profile_body("Acme"))).await?;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(first["id"], second["id"]);
    assert_eq!(app.profiles.count_by_owner(user.id), 1);
    Ok(())
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() -> anyhow::Result<()> {
    let app = build_app();
    let (_, token) = app.user_with_token("Owner", Role::Business).await?;
    app.send("POST", "/api/business/profile", Some(&token), Some(profile_body("Acme"))).await?;

    let (status, updated) = app
        .send("POST", "/api/business/profile", Some(&token), Some(json!({"businessName": "Acme Holdings"})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["businessName"], "Acme Holdings");
    assert_eq!(updated["incorporationType"], "LLC");
    assert_eq!(updated["contact"]["phone"], "555-0100");
    Ok(())
}

#[tokio::test]
async fn test_profile_round_trip_with_owner_name() -> anyhow::Result<()> {
    let app = build_app();
    let (user, token) = app.user_with_token("Round Trip", Role::Business).await?;
    let body = profile_body("Round Trip Ltd");
    app.send("POST", "/api/business/profile", Some(&token), Some(body.clone())).await?;

    let (status, found) = app.send("GET", &format!("/api/business/profile/{}", user.id), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    for key in ["businessName", "incorporationType", "description", "contact", "productsAndServices"] {
        assert_eq!(found[key], body[key], "field {}", key);
    }
    assert_eq!(found["userId"], json!(user.id));
    assert_eq!(found["user"]["name"], "Round Trip");

    let (status, own) = app.send("GET", "/api/business/profile/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["id"], found["id"]);
    Ok(())
}

#[tokio::test]
async fn test_missing_profiles_are_404() -> anyhow::Result<()> {
    let app = build_app();
    let (_, token) = app.user_with_token("Nobody", Role::Business).await?;

    let (status, err) = app.send("GET", "/api/business/profile/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Profile not found");

    let (status, err) = app.send("GET", &format!("/api/business/profile/{}", Uuid::new_v4()), None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Profile not found");

    let (status, err) = app.send("GET", &format!("/api/business/financials/{}", Uuid::new_v4()), None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Business profile not found");

    let (status, err) = app.send("POST", "/api/business/financials", Some(&token), Some(json!({"roi": 1.0}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Profile not found");
    Ok(())
}

#[tokio::test]
async fn test_malformed_owner_id_is_server_error() -> anyhow::Result<()> {
    let app = build_app();
    let (status, err) = app.send("GET", "/api/business/profile/not-a-uuid", None, None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err["message"].as_str().unwrap_or_default().contains("invalid user id"));
    Ok(())
}

#[tokio::test]
async fn test_missing_required_fields_surface_as_500() -> anyhow::Result<()> {
    let app = build_app();
    let (_, token) = app.user_with_token("Sloppy", Role::Business).await?;
    let (status, err) = app
        .send("POST", "/api/business/profile", Some(&token), Some(json!({"description": "no name"})))
        .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err["message"].as_str().unwrap_or_default().contains("businessName"));
    Ok(())
}

#[tokio::test]
async fn test_search_sorts_by_latest_revenue_descending() -> anyhow::Result<()> {
    let app = build_app();
    for (name, amount) in [("Hundred Co", 100.0), ("Fifty Co", 50.0), ("TwoHundred Co", 200.0)] {
        let (_, token) = app.user_with_token(name, Role::Business).await?;
        app.send("POST", "/api/business/profile", Some(&token), Some(profile_body(name))).await?;
        let (status, _) = app.send("POST", "/api/business/financials", Some(&token), Some(revenue_stats(amount))).await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, list) = app.send("GET", "/api/business/search?sortBy=revenue", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let amounts: Vec<f64> = list
        .as_array()
        .expect("array")
        .iter()
        .map(|p| p["financialStats"]["revenue"][0]["amount"].as_f64().unwrap_or_default())
        .collect();
    assert_eq!(amounts, vec![200.0, 100.0, 50.0]);
    assert!(list[0]["user"]["name"].is_string());

    // sortBy defaults to revenue
    let (_, default_sorted) = app.send("GET", "/api/business/search", None, None).await?;
    assert_eq!(default_sorted, list);

    // unknown keys keep insertion order
    let (_, unsorted) = app.send("GET", "/api/business/search?sortBy=industry", None, None).await?;
    let names: Vec<&str> = unsorted.as_array().expect("array").iter().filter_map(|p| p["businessName"].as_str()).collect();
    assert_eq!(names, vec!["Hundred Co", "Fifty Co", "TwoHundred Co"]);
    Ok(())
}

#[tokio::test]
async fn test_search_filters_by_name_and_type() -> anyhow::Result<()> {
    let app = build_app();
    let (_, a) = app.user_with_token("A", Role::Business).await?;
    let (_, b) = app.user_with_token("B", Role::Business).await?;
    app.send("POST", "/api/business/profile", Some(&a), Some(profile_body("Blue Widgets"))).await?;
    let mut corp = profile_body("Red Widgets");
    corp["incorporationType"] = json!("Corporation");
    app.send("POST", "/api/business/profile", Some(&b), Some(corp)).await?;

    let (_, by_name) = app.send("GET", "/api/business/search?name=BLUE", None, None).await?;
    assert_eq!(by_name.as_array().map(Vec::len), Some(1));
    assert_eq!(by_name[0]["businessName"], "Blue Widgets");

    let (_, by_type) = app.send("GET", "/api/business/search?type=Corporation&location=anywhere", None, None).await?;
    assert_eq!(by_type.as_array().map(Vec::len), Some(1));
    assert_eq!(by_type[0]["businessName"], "Red Widgets");

    let (_, all) = app.send("GET", "/api/business/profiles", None, None).await?;
    assert_eq!(all.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_financial_replace_is_total() -> anyhow::Result<()> {
    let app = build_app();
    let (user, token) = app.user_with_token("Lossy", Role::Business).await?;
    app.send("POST", "/api/business/profile", Some(&token), Some(profile_body("Lossy LLC"))).await?;
    app.send("POST", "/api/business/financials", Some(&token), Some(revenue_stats(10.0))).await?;

    let (status, resp) = app.send("POST", "/api/business/financials", Some(&token), Some(json!({"roi": 10.0}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Financial stats updated");
    assert_eq!(resp["financialStats"], json!({"roi": 10.0}));

    let (status, stats) = app.send("GET", &format!("/api/business/financials/{}", user.id), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, json!({"roi": 10.0}));
    assert!(stats.get("cagr").is_none());
    Ok(())
}

#[tokio::test]
async fn test_own_financials_require_revenue_series() -> anyhow::Result<()> {
    let app = build_app();
    let (user, token) = app.user_with_token("Fresh", Role::Business).await?;
    app.send("POST", "/api/business/profile", Some(&token), Some(profile_body("Fresh Co"))).await?;

    let (status, err) = app.send("GET", "/api/business/financials/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Revenue data not found");

    let (status, stats) = app.send("GET", &format!("/api/business/financials/{}", user.id), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, Value::Null);

    app.send("POST", "/api/business/financials", Some(&token), Some(revenue_stats(80.0))).await?;
    let (status, series) = app.send("GET", "/api/business/financials/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series, json!([{"year": 2024, "amount": 80.0}, {"year": 2023, "amount": 40.0}]));
    Ok(())
}

#[tokio::test]
async fn test_undecodable_bodies_surface_as_500_message() -> anyhow::Result<()> {
    let app = build_app();
    let (user, token) = app.user_with_token("Typo", Role::Business).await?;

    let (status, err) = app
        .send("POST", "/api/business/profile", Some(&token), Some(json!({"businessName": 42, "incorporationType": "LLC"})))
        .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err["message"].as_str().unwrap_or_default().contains("businessName"));

    // no body and no content-type
    let (status, err) = app.send("POST", "/api/business/profile", Some(&token), None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err["message"].is_string());

    app.send("POST", "/api/business/profile", Some(&token), Some(profile_body("Typo Co"))).await?;
    let (status, err) = app
        .send("POST", "/api/business/financials", Some(&token), Some(json!({"revenue": "lots"})))
        .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err["message"].is_string());

    let (_, stats) = app.send("GET", &format!("/api/business/financials/{}", user.id), None, None).await?;
    assert_eq!(stats, Value::Null);
    Ok(())
}
