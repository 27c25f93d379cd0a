//! Integration tests for the request rate limiting middleware

mod common;

use actix_web::{
    http::{header, StatusCode},
    test, App,
};
use serde_json::Value;

use common::{setup, setup_with};
use sg_api::app::configure;
use sg_shared::config::BucketLimits;

fn health_from(ip: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri("/health")
        .peer_addr(format!("{}:40000", ip).parse().unwrap())
}

#[actix_web::test]
async fn test_burst_then_reject_with_retry_after() {
    // 10 token burst refilled at 5 per second
    let ctx = setup(BucketLimits::new(10, 5.0)).await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .wrap(ctx.limiter.clone())
            .configure(configure),
    )
    .await;

    for _ in 0..10 {
        let resp = test::call_service(&app, health_from("192.0.2.50").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = test::call_service(&app, health_from("192.0.2.50").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        resp.headers().get(header::RETRY_AFTER).unwrap().to_str().unwrap(),
        "1"
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "RATE_LIMIT_EXCEEDED");

    // other clients keep their own budget
    let resp = test::call_service(&app, health_from("192.0.2.51").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(ctx.limiter.registry().len(), 2);
}

#[actix_web::test]
async fn test_budget_refills_over_time() {
    let ctx = setup(BucketLimits::new(2, 20.0)).await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .wrap(ctx.limiter.clone())
            .configure(configure),
    )
    .await;

    for _ in 0..2 {
        let resp = test::call_service(&app, health_from("192.0.2.60").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = test::call_service(&app, health_from("192.0.2.60").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // one token every 50ms
    actix_rt::time::sleep(std::time::Duration::from_millis(120)).await;

    let resp = test::call_service(&app, health_from("192.0.2.60").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_forwarded_header_does_not_open_a_new_budget() {
    let ctx = setup(BucketLimits::new(3, 0.5)).await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .wrap(ctx.limiter.clone())
            .configure(configure),
    )
    .await;

    for i in 0..3 {
        let req = health_from("192.0.2.70")
            .insert_header(("X-Forwarded-For", format!("198.51.100.{}", i)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = health_from("192.0.2.70")
        .insert_header(("X-Forwarded-For", "198.51.100.99"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    // one token every 2 s
    assert_eq!(resp.headers().get(header::RETRY_AFTER).unwrap(), "2");
}

#[actix_web::test]
async fn test_trusted_proxy_headers_identify_clients() {
    let ctx = setup_with(BucketLimits::new(1, 0.1), true).await;
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .wrap(ctx.limiter.clone())
            .configure(configure),
    )
    .await;

    let proxied = |client: &str| {
        health_from("10.0.0.1")
            .insert_header(("X-Forwarded-For", client.to_string()))
            .to_request()
    };

    assert_eq!(test::call_service(&app, proxied("203.0.113.5")).await.status(), StatusCode::OK);
    assert_eq!(
        test::call_service(&app, proxied("203.0.113.5")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(test::call_service(&app, proxied("203.0.113.6")).await.status(), StatusCode::OK);
}
