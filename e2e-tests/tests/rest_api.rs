// REST surface E2E tests: real HTTP against a spawned server.

use anyhow::Result;
use e2e_tests::TestApp;

#[tokio::test]
async fn test_read_endpoints_serve_seeded_fleet() -> Result<()> {
    let app = TestApp::spawn().await?;
    let client = reqwest::Client::new();
    let base = app.http_base_url();

    let satellites: serde_json::Value = client
        .get(format!("{}/api/satellites", base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let satellites = satellites.as_array().unwrap();
    assert_eq!(satellites.len(), 3);
    assert_eq!(satellites[0]["name"], "SAT-2847");
    assert_eq!(satellites[1]["type"], "GEO");

    let mission: serde_json::Value = client
        .get(format!("{}/api/mission", base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(mission["name"], "Global Satellite Network");
    assert_eq!(mission["inTransit"], 3);

    let stations: serde_json::Value = client
        .get(format!("{}/api/ground-stations", base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(stations.as_array().unwrap().len(), 3);

    let telemetry: serde_json::Value = client
        .get(format!("{}/api/telemetry", base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(telemetry["powerStatus"], "optimal");

    let activities: serde_json::Value = client
        .get(format!("{}/api/activities", base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(activities.as_array().unwrap().len(), 3);

    app.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_satellite_command_round_trip() -> Result<()> {
    let app = TestApp::spawn().await?;
    let client = reqwest::Client::new();
    let base = app.http_base_url();

    let response: serde_json::Value = client
        .post(format!("{}/api/satellites/2/command", base))
        .json(&serde_json::json!({"command": "DEPLOY_PANEL"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(response["success"], true);
    assert_eq!(response["message"], "Command \"DEPLOY_PANEL\" sent to SAT-1903");

    // The command shows up in the activity feed, newest first
    let activities: serde_json::Value = client
        .get(format!("{}/api/activities", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(
        activities[0]["message"],
        "Command sent to SAT-1903: DEPLOY_PANEL"
    );
    assert_eq!(activities[0]["type"], "info");

    app.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_command_to_unknown_satellite_is_problem_json() -> Result<()> {
    let app = TestApp::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/satellites/404/command", app.http_base_url()))
        .json(&serde_json::json!({"command": "PING"}))
        .send()
        .await?;

    assert_eq!(response.status(), 404);
    assert_eq!(
        response.headers()["content-type"],
        "application/problem+json"
    );
    let problem: serde_json::Value = response.json().await?;
    assert_eq!(problem["status"], 404);
    assert_eq!(problem["title"], "Not Found");

    app.shutdown().await;
    Ok(())
}
