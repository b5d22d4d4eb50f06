mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/").await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["success"], true);
    assert_eq!(res.json()["data"]["name"], "Show Catalog");
    Ok(())
}

#[tokio::test]
async fn health_reports_store_status() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/health").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"]["database"], "memory");

    app.store.set_unavailable(true);
    let res = app.get("/health").await?;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json()["success"], false);
    assert_eq!(res.json()["data"]["status"], "degraded");
    Ok(())
}
