use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{AuthConfig, ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    engine.seed_demo_users().await.unwrap();
    router(ServerState::new(engine, AuthConfig::new("test-secret", 1)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes)
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, token, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, body: Value) -> Value {
    let (status, body) = send_json(app, Method::POST, "/transactions", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn login_and_register() {
    let app = app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "nope!!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "admin@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password are required");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "New", "email": "new@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Again", "email": "new@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app().await;

    let (status, body) = send_json(&app, Method::GET, "/transactions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send_json(&app, Method::GET, "/transactions", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(&app, Method::GET, "/transactions/sample?limit=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalItems"], 5);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(body["transactions"][0]["description"], "Office Supplies");
}

#[tokio::test]
async fn transaction_crud_is_owner_scoped() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;
    let john = login(&app, "admin@example.com", "admin123").await;

    let created = create(
        &app,
        &jane,
        json!({
            "type": "expense",
            "amountMinor": 4000,
            "description": "A,B",
            "category": "X",
            "date": "2024-01-10",
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["notes"], "");
    assert_eq!(created["tags"], json!([]));

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/transactions",
        Some(&jane),
        Some(json!({ "type": "expense", "description": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All required fields must be provided");

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/transactions",
        Some(&jane),
        Some(json!({
            "type": "transfer",
            "amountMinor": 1,
            "description": "x",
            "category": "y",
            "date": "2024-01-10",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // John cannot see, change or delete Jane's record.
    let (_, body) = send_json(&app, Method::GET, "/transactions", Some(&john), None).await;
    assert_eq!(body["pagination"]["totalItems"], 0);
    let uri = format!("/transactions/{id}");
    let (status, body) = send_json(
        &app,
        Method::PUT,
        &uri,
        Some(&john),
        Some(json!({ "amountMinor": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transaction not found");
    let (status, _) = send_json(&app, Method::DELETE, &uri, Some(&john), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let patch = json!({ "amountMinor": 4500, "notes": "raised" });
    let (status, first) = send_json(&app, Method::PUT, &uri, Some(&jane), Some(patch.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["amountMinor"], 4500);
    assert_eq!(first["category"], "X");
    let (_, second) = send_json(&app, Method::PUT, &uri, Some(&jane), Some(patch)).await;
    assert_eq!(first, second);

    let (status, body) = send_json(&app, Method::DELETE, &uri, Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction deleted successfully");
    let (status, _) = send_json(&app, Method::DELETE, &uri, Some(&jane), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_and_rejects_bad_dates() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;
    for (kind, amount, category, date) in [
        ("income", 10_000, "Sales", "2024-01-05"),
        ("expense", 4_000, "Rent", "2024-01-10"),
        ("income", 5_000, "Sales", "2024-02-01"),
    ] {
        create(
            &app,
            &jane,
            json!({
                "type": kind,
                "amountMinor": amount,
                "description": format!("{category} entry"),
                "category": category,
                "date": date,
            }),
        )
        .await;
    }

    let (_, body) = send_json(
        &app,
        Method::GET,
        "/transactions?type=income&sortBy=amount&sortOrder=asc",
        Some(&jane),
        None,
    )
    .await;
    let amounts: Vec<i64> = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["amountMinor"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![5_000, 10_000]);

    // Unknown types are ignored; bad page values fall back to defaults.
    let (_, body) = send_json(
        &app,
        Method::GET,
        "/transactions?type=bogus&page=zero&limit=-3",
        Some(&jane),
        None,
    )
    .await;
    assert_eq!(body["pagination"]["totalItems"], 3);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["itemsPerPage"], 10);

    let (status, _) = send_json(
        &app,
        Method::GET,
        "/transactions?startDate=not-a-date",
        Some(&jane),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/transactions/stats?endDate=2024-01-31",
        Some(&jane),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"][0]["type"], "income");
    assert_eq!(body["stats"][0]["total"], 10_000);
    assert_eq!(body["categoryStats"][1]["categories"][0]["name"], "Rent");
}

#[tokio::test]
async fn csv_export_is_an_attachment() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;
    create(
        &app,
        &jane,
        json!({
            "type": "expense",
            "amountMinor": 4000,
            "description": "A,B",
            "category": "X",
            "date": "2024-01-10",
        }),
    )
    .await;

    let (status, headers, bytes) = send(
        &app,
        Method::GET,
        "/export/transactions/csv",
        Some(&jane),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=transactions.csv"
    );
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.ends_with("1/10/2024,expense,-40,\"A,B\",\"X\",\"\""));

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[3], "A,B");
}

#[tokio::test]
async fn dashboard_and_report_exports() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;
    create(
        &app,
        &jane,
        json!({
            "type": "income",
            "amountMinor": 10_000,
            "description": "Invoice",
            "category": "Work",
            "date": "2024-01-05",
        }),
    )
    .await;

    let (status, headers, bytes) = send(
        &app,
        Method::GET,
        "/export/dashboard/json",
        Some(&jane),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=dashboard-data.json"
    );
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["summary"]["totalRevenue"], 10_000);
    assert_eq!(body["period"], "monthly");
    assert_eq!(body["categoryBreakdown"]["Work"]["income"], 10_000);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/export/report",
        Some(&jane),
        Some(json!({ "types": ["expense"], "format": "pdf" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["transactionCount"], 0);
    assert_eq!(body["filters"]["types"], json!(["expense"]));

    let (status, headers, _) = send(
        &app,
        Method::POST,
        "/export/report",
        Some(&jane),
        Some(json!({ "format": "csv" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=custom-report.csv"
    );
}

#[tokio::test]
async fn dashboard_endpoints_respond() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;
    let today = chrono::Utc::now().date_naive().to_string();
    create(
        &app,
        &jane,
        json!({
            "type": "income",
            "amountMinor": 20_000,
            "description": "Invoice",
            "category": "Work",
            "date": today,
        }),
    )
    .await;
    create(
        &app,
        &jane,
        json!({
            "type": "expense",
            "amountMinor": 5_000,
            "description": "Rent",
            "category": "Rent",
            "date": today,
        }),
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/dashboard/overview?period=weekly",
        Some(&jane),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overview"]["netProfit"], 15_000);
    assert_eq!(body["overview"]["profitMargin"], 75.0);
    assert_eq!(body["categoryBreakdown"][0]["color"], "hsl(0, 70%, 50%)");
    assert_eq!(body["monthlyData"].as_array().unwrap().len(), 1);

    let (_, body) = send_json(&app, Method::GET, "/dashboard/revenue?period=yearly", Some(&jane), None).await;
    assert_eq!(body["period"], "yearly");
    assert_eq!(body["data"][0]["revenue"], 20_000);

    let (_, body) = send_json(&app, Method::GET, "/dashboard/expenses", Some(&jane), None).await;
    assert_eq!(body["categories"][0]["name"], "Rent");

    let (_, body) = send_json(&app, Method::GET, "/dashboard/profit-loss", Some(&jane), None).await;
    assert_eq!(body["summary"]["netProfit"], 15_000);
}

#[tokio::test]
async fn users_endpoints() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;
    let john = login(&app, "admin@example.com", "admin123").await;

    let (status, body) = send_json(&app, Method::GET, "/users/profile", Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane User");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/users/profile",
        Some(&jane),
        Some(json!({ "email": "admin@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already in use");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/users/profile",
        Some(&jane),
        Some(json!({ "name": "Jane Q. User", "avatar": "a.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane Q. User");
    assert_eq!(body["avatar"], "a.png");

    let (status, body) = send_json(&app, Method::GET, "/users", Some(&jane), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let (status, body) = send_json(&app, Method::GET, "/users?search=jane", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalItems"], 1);
    assert_eq!(body["users"][0]["email"], "user@example.com");
}

#[tokio::test]
async fn huge_page_is_empty_not_a_crash() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;
    let john = login(&app, "admin@example.com", "admin123").await;
    create(
        &app,
        &jane,
        json!({
            "type": "income",
            "amountMinor": 100,
            "description": "Invoice",
            "category": "Work",
            "date": "2024-01-05",
        }),
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/transactions?page=1000000000000000000",
        Some(&jane),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"], json!([]));
    assert_eq!(body["pagination"]["currentPage"], 1_000_000_000_000_000_000u64);
    assert_eq!(body["pagination"]["totalItems"], 1);

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/users?page=18446744073709551615",
        Some(&john),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], json!([]));
    assert_eq!(body["pagination"]["totalItems"], 2);
}

#[tokio::test]
async fn oversized_amount_is_rejected() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/transactions",
        Some(&jane),
        Some(json!({
            "type": "income",
            "amountMinor": i64::MAX,
            "description": "Too much",
            "category": "Work",
            "date": "2024-01-05",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Amount must not exceed 10000000000000");
}

#[tokio::test]
async fn malformed_bodies_use_the_error_shape() {
    let app = app().await;
    let jane = login(&app, "user@example.com", "user123").await;

    let raw = |body: &'static str, content_type: Option<&'static str>| {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/transactions")
            .header(header::AUTHORIZATION, format!("Bearer {jane}"));
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    };

    for request in [
        raw(
            r#"{"type":"income","amountMinor":"40","description":"x","category":"y","date":"2024-01-05"}"#,
            Some("application/json"),
        ),
        raw("{not json", Some("application/json")),
        raw(r#"{"type":"income"}"#, None),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "{body}");
    }

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": 5, "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
