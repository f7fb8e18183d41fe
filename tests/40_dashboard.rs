mod common;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::{Duration, Utc};

fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn empty_store_reports_zeroes() -> Result<()> {
    let app = common::test_app();

    let (status, summary) = common::send(&app, "GET", "/api/dashboard/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalProperties"], 0);
    assert_eq!(summary["occupancyRate"], 0);
    assert_eq!(summary["occupiedProperties"], 0);
    assert_eq!(summary["totalMonthlyRent"], 0.0);
    assert_eq!(summary["totalMonthlyIncome"], 0.0);
    assert_eq!(summary["propertiesByType"].as_array().expect("array").len(), 0);
    assert_eq!(summary["upcomingExpirations"].as_array().expect("array").len(), 0);
    Ok(())
}

#[tokio::test]
async fn aggregates_live_property_and_contract_rows() -> Result<()> {
    let app = common::test_app();
    let occupied = common::create_property(&app, "Occupied One").await;
    common::create_property(&app, "Vacant One").await;

    let (status, _) = common::create_contract(&app, &occupied, "active", &days_from_now(30), 1500.0).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, summary) = common::send(&app, "GET", "/api/dashboard/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalProperties"], 2);
    assert_eq!(summary["occupiedProperties"], 1);
    assert_eq!(summary["occupancyRate"], 50);
    assert_eq!(summary["totalMonthlyIncome"], 1500.0);
    assert_eq!(summary["totalMonthlyRent"], 1500.0);

    let statuses = summary["propertiesByStatus"].as_array().expect("array");
    assert!(statuses
        .iter()
        .any(|s| s["status"] == "occupied" && s["count"] == 1));
    assert!(statuses
        .iter()
        .any(|s| s["status"] == "available" && s["count"] == 1));

    let expirations = summary["upcomingExpirations"].as_array().expect("array");
    assert_eq!(expirations.len(), 1);
    assert_eq!(expirations[0]["property_name"], "Occupied One");
    assert_eq!(expirations[0]["tenant_name"], "Ana Torres");
    Ok(())
}

#[tokio::test]
async fn expirations_only_cover_the_next_sixty_days() -> Result<()> {
    let app = common::test_app();
    let soon = common::create_property(&app, "Ending Soon").await;
    let later = common::create_property(&app, "Ending Later").await;

    common::create_contract(&app, &soon, "active", &days_from_now(20), 1000.0).await;
    common::create_contract(&app, &later, "active", &days_from_now(200), 1000.0).await;

    let (_, summary) = common::send(&app, "GET", "/api/dashboard/summary").await;
    let expirations = summary["upcomingExpirations"].as_array().expect("array");
    assert_eq!(expirations.len(), 1);
    assert_eq!(expirations[0]["property_name"], "Ending Soon");
    Ok(())
}

#[tokio::test]
async fn occupancy_rate_rounds_to_nearest_percent() -> Result<()> {
    let app = common::test_app();
    let first = common::create_property(&app, "One").await;
    common::create_property(&app, "Two").await;
    common::create_property(&app, "Three").await;

    common::create_contract(&app, &first, "active", &days_from_now(300), 700.0).await;

    let (_, summary) = common::send(&app, "GET", "/api/dashboard/summary").await;
    assert_eq!(summary["totalProperties"], 3);
    assert_eq!(summary["occupancyRate"], 33);
    Ok(())
}
