//! End-to-end endpoint behavior, driven through the full router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::http::StatusCode;
use serde_json::json;

use fakesvc_server::obs::service::{
    ACTIVE_USERS, CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, DB_QUERY_DURATION,
    EXTERNAL_API_CALLS_TOTAL, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};
use fakesvc_server::obs::Sample;

use harness::{app, happy_app, json, send};

#[tokio::test]
async fn root_lists_capabilities() {
    let (_state, app) = happy_app();
    let (status, body) = json(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Fake Service API");
    assert_eq!(body["version"], "1.0.0");
    let endpoints = body["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 7);
    assert!(endpoints.contains(&json!("/users/{user_id}")));
}

#[tokio::test]
async fn health_reports_timestamp() {
    let (_state, app) = happy_app();
    let (status, body) = json(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_f64().unwrap() > 1_600_000_000.0);
}

#[tokio::test]
async fn user_ids_increase_from_one() {
    let (_state, app) = happy_app();

    for expected in 1..=3u64 {
        let (status, user) = json(
            &app,
            "POST",
            "/users",
            Some(json!({ "name": format!("u{expected}"), "email": "u@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["id"], expected);
        assert_eq!(user["name"], format!("u{expected}"));
        assert!(user["created_at"].as_f64().is_some());
    }
}

#[tokio::test]
async fn create_user_accepts_query_params() {
    let (_state, app) = happy_app();
    let (status, user) = json(&app, "POST", "/users?name=alice&email=alice%40example.com", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], 1);
    assert_eq!(user["email"], "alice@example.com");
}

#[tokio::test]
async fn create_user_body_wins_over_query() {
    let (state, app) = happy_app();
    let (status, user) = json(
        &app,
        "POST",
        "/users?name=q&email=q%40x",
        Some(json!({ "name": "b", "email": "b@x" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], 1);
    assert_eq!(user["name"], "b");
    assert_eq!(user["email"], "b@x");
    assert_eq!(state.store().find_user(1).await.unwrap().email, "b@x");
}

#[tokio::test]
async fn create_order_with_malformed_query_is_unprocessable() {
    let (state, app) = happy_app();
    let (status, body) = json(&app, "POST", "/orders?user_id=1&product=X&amount=abc", None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({ "detail": "user_id, product and amount are missing or invalid" }));
    assert_eq!(state.store().order_count().await, 0);
    assert_eq!(
        state.metrics().registry().sample(EXTERNAL_API_CALLS_TOTAL, &["payment_gateway", "success"]),
        None
    );
}

#[tokio::test]
async fn create_user_without_params_is_unprocessable() {
    let (state, app) = happy_app();
    let (status, body) = json(&app, "POST", "/users", None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({ "detail": "name and email are missing or invalid" }));
    assert_eq!(state.store().user_count().await, 0);
}

#[tokio::test]
async fn failed_email_validation_is_400_and_creates_nothing() {
    let (state, app) = app(0.0, 1.0, 1.0);

    for _ in 0..10 {
        let (status, body) = json(
            &app,
            "POST",
            "/users",
            Some(json!({ "name": "bob", "email": "bob@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "Email validation failed" }));
    }

    assert_eq!(state.store().user_count().await, 0);
    let reg = state.metrics().registry();
    assert_eq!(
        reg.sample(EXTERNAL_API_CALLS_TOTAL, &["email_validation_service", "failure"]),
        Some(Sample::Counter(10.0))
    );
    assert_eq!(
        reg.sample(HTTP_REQUESTS_TOTAL, &["POST", "/users", "400"]),
        Some(Sample::Counter(10.0))
    );
    assert_eq!(reg.sample(DB_QUERY_DURATION, &["INSERT"]), None);
}

#[tokio::test]
async fn list_users_is_cached_until_a_user_is_created() {
    let (state, app) = happy_app();

    let (_, first) = json(&app, "GET", "/users", None).await;
    assert_eq!(first, json!({ "users": [], "count": 0 }));
    let (_, second) = json(&app, "GET", "/users", None).await;
    assert_eq!(second, first);

    let reg = state.metrics().registry();
    assert_eq!(reg.sample(CACHE_MISSES_TOTAL, &["users"]), Some(Sample::Counter(1.0)));
    assert_eq!(reg.sample(CACHE_HITS_TOTAL, &["users"]), Some(Sample::Counter(1.0)));
    match reg.sample(ACTIVE_USERS, &[]) {
        Some(Sample::Gauge(v)) => assert!((10.0..=100.0).contains(&v), "{v}"),
        other => panic!("unexpected gauge: {other:?}"),
    }

    let (status, _) = json(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "carol", "email": "carol@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = json(&app, "GET", "/users", None).await;
    assert_eq!(after["count"], 1);
    assert_eq!(after["users"][0]["name"], "carol");
    assert_eq!(reg.sample(CACHE_MISSES_TOTAL, &["users"]), Some(Sample::Counter(2.0)));
}

#[tokio::test]
async fn slow_list_read_cannot_recache_a_pre_create_snapshot() {
    let (state, app) = happy_app();

    // Park the list read between its cache miss and its store read.
    let guard = state.store().users().await;
    let list = tokio::spawn({
        let app = app.clone();
        async move { json(&app, "GET", "/users", None).await }
    });
    for _ in 0..32 {
        if state.metrics().registry().sample(CACHE_MISSES_TOTAL, &["users"]).is_some() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(
        state.metrics().registry().sample(CACHE_MISSES_TOTAL, &["users"]),
        Some(Sample::Counter(1.0))
    );
    assert!(!list.is_finished());

    let create = tokio::spawn({
        let app = app.clone();
        async move {
            json(&app, "POST", "/users", Some(json!({ "name": "h", "email": "h@x" }))).await
        }
    });
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    drop(guard);

    let (list_status, _) = list.await.unwrap();
    let (create_status, _) = create.await.unwrap();
    assert_eq!(list_status, StatusCode::OK);
    assert_eq!(create_status, StatusCode::OK);

    let (_, after) = json(&app, "GET", "/users", None).await;
    assert_eq!(after["count"], 1);
    assert_eq!(after["users"][0]["name"], "h");
}

#[tokio::test]
async fn create_user_bumps_active_users_gauge() {
    let (state, app) = happy_app();
    json(&app, "GET", "/users", None).await;
    let before = match state.metrics().registry().sample(ACTIVE_USERS, &[]) {
        Some(Sample::Gauge(v)) => v,
        other => panic!("unexpected gauge: {other:?}"),
    };

    json(&app, "POST", "/users", Some(json!({ "name": "d", "email": "d@x" }))).await;

    assert_eq!(
        state.metrics().registry().sample(ACTIVE_USERS, &[]),
        Some(Sample::Gauge(before + 1.0))
    );
}

#[tokio::test]
async fn get_user_caches_per_id_and_survives_later_creates() {
    let (state, app) = happy_app();
    json(&app, "POST", "/users", Some(json!({ "name": "erin", "email": "e@x" }))).await;

    let (status, user) = json(&app, "GET", "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "erin");

    // Creating another user drops `all_users` only; `user_1` stays cached.
    json(&app, "POST", "/users", Some(json!({ "name": "fay", "email": "f@x" }))).await;
    let (_, again) = json(&app, "GET", "/users/1", None).await;
    assert_eq!(again, user);

    let reg = state.metrics().registry();
    assert_eq!(reg.sample(CACHE_MISSES_TOTAL, &["user"]), Some(Sample::Counter(1.0)));
    assert_eq!(reg.sample(CACHE_HITS_TOTAL, &["user"]), Some(Sample::Counter(1.0)));
}

#[tokio::test]
async fn unknown_user_is_404_without_side_effects() {
    let (state, app) = happy_app();
    let (status, body) = json(&app, "GET", "/users/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "User not found" }));
    assert_eq!(state.store().user_count().await, 0);
    assert_eq!(state.cache().len(), 0);

    let reg = state.metrics().registry();
    assert_eq!(
        reg.sample(HTTP_REQUESTS_TOTAL, &["GET", "/users/42", "404"]),
        Some(Sample::Counter(1.0))
    );
    assert!(matches!(
        reg.sample(HTTP_REQUEST_DURATION, &["GET", "/users/42"]),
        Some(Sample::Histogram { count: 1, .. })
    ));
}

#[tokio::test]
async fn non_numeric_id_is_rejected_and_still_counted() {
    let (state, app) = happy_app();
    let (status, _, _) = send(&app, "GET", "/users/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        state.metrics().registry().sample(HTTP_REQUESTS_TOTAL, &["GET", "/users/abc", "400"]),
        Some(Sample::Counter(1.0))
    );
}

#[tokio::test]
async fn unknown_route_is_instrumented() {
    let (state, app) = happy_app();
    let (status, _, _) = send(&app, "GET", "/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        state.metrics().registry().sample(HTTP_REQUESTS_TOTAL, &["GET", "/nope", "404"]),
        Some(Sample::Counter(1.0))
    );
}

#[tokio::test]
async fn first_order_on_fresh_process_is_completed_with_id_one() {
    let (_state, app) = happy_app();
    let (status, order) = json(
        &app,
        "POST",
        "/orders",
        Some(json!({ "user_id": 1, "product": "X", "amount": 9.99 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["id"], 1);
    assert_eq!(order["user_id"], 1);
    assert_eq!(order["product"], "X");
    assert_eq!(order["amount"], 9.99);
    assert_eq!(order["status"], "completed");

    let (status, fetched) = json(&app, "GET", "/orders/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, order);
}

#[tokio::test]
async fn create_order_accepts_query_params_for_unknown_user() {
    let (_state, app) = happy_app();
    let (status, order) =
        json(&app, "POST", "/orders?user_id=999&product=widget&amount=3.5", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["user_id"], 999);
    assert_eq!(order["amount"], 3.5);
}

#[tokio::test]
async fn payment_failure_is_503() {
    let (state, app) = app(1.0, 0.0, 1.0);
    let (status, body) = json(
        &app,
        "POST",
        "/orders",
        Some(json!({ "user_id": 1, "product": "X", "amount": 9.99 })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "detail": "Payment gateway unavailable" }));
    assert_eq!(state.store().order_count().await, 0);
}

#[tokio::test]
async fn list_orders_ignores_pricing_failures() {
    let (state, app) = app(1.0, 1.0, 0.0);
    json(&app, "POST", "/orders", Some(json!({ "user_id": 2, "product": "Y", "amount": 1.0 }))).await;

    let (status, body) = json(&app, "GET", "/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["orders"][0]["product"], "Y");

    let reg = state.metrics().registry();
    assert_eq!(
        reg.sample(EXTERNAL_API_CALLS_TOTAL, &["pricing_service", "failure"]),
        Some(Sample::Counter(1.0))
    );
    assert!(matches!(
        reg.sample(DB_QUERY_DURATION, &["SELECT_WITH_JOIN"]),
        Some(Sample::Histogram { count: 1, .. })
    ));
}

#[tokio::test]
async fn unknown_order_is_404() {
    let (_state, app) = happy_app();
    let (status, body) = json(&app, "GET", "/orders/5", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Order not found" }));
}

#[tokio::test]
async fn stats_reports_counts_and_cache_size() {
    let (_state, app) = happy_app();
    json(&app, "POST", "/users", Some(json!({ "name": "g", "email": "g@x" }))).await;
    json(&app, "GET", "/users", None).await;
    json(&app, "GET", "/users/1", None).await;
    json(&app, "POST", "/orders", Some(json!({ "user_id": 1, "product": "Z", "amount": 2.0 }))).await;

    let (status, stats) = json(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_users"], 1);
    assert_eq!(stats["total_orders"], 1);
    assert_eq!(stats["cache_size"], 2);
    let active = stats["active_users"].as_u64().unwrap();
    assert!((10..=100).contains(&active), "{active}");
    let uptime = stats["uptime_seconds"].as_f64().unwrap();
    assert!((0.0..60.0).contains(&uptime), "{uptime}");
}

#[tokio::test]
async fn metrics_scrape_only_moves_its_own_request_series() {
    let (state, app) = happy_app();

    let (status, text, content_type) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; version=0.0.4; charset=utf-8"));
    assert!(text.contains("# TYPE http_requests_total counter"), "{text}");
    assert!(text.contains("# HELP active_users Number of active users"), "{text}");

    let (_, text2, _) = send(&app, "GET", "/metrics", None).await;
    assert!(
        text2.contains(r#"http_requests_total{method="GET",endpoint="/metrics",status="200"} 1"#),
        "{text2}"
    );

    let reg = state.metrics().registry();
    assert_eq!(
        reg.sample(HTTP_REQUESTS_TOTAL, &["GET", "/metrics", "200"]),
        Some(Sample::Counter(2.0))
    );
    assert!(!text2.contains("external_api_calls_total{"), "{text2}");
    assert!(!text2.contains("cache_hits_total{"), "{text2}");
    assert!(!text2.contains("db_query_duration_seconds_count{"), "{text2}");
    assert_eq!(reg.sample(ACTIVE_USERS, &[]), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_unique_sequential_ids() {
    let (state, app) = happy_app();
    const N: u64 = 32;

    let mut tasks = Vec::new();
    for i in 0..N {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let (status, user) = json(
                &app,
                "POST",
                "/users",
                Some(json!({ "name": format!("n{i}"), "email": "n@x" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            user["id"].as_u64().unwrap()
        }));
    }

    let mut ids = Vec::new();
    for t in tasks {
        ids.push(t.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=N).collect::<Vec<_>>());
    assert_eq!(state.store().user_count().await, N as usize);
}
