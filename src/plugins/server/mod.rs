mod auth;
mod handlers;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use axum::{
  Router,
  routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

pub struct Plugin;

pub fn router(app: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(handlers::health))
    .route("/api/plans", get(handlers::plans))
    .route("/api/courses", get(handlers::courses))
    .route("/api/courses/{id}/access", get(handlers::access))
    .route("/api/courses/{id}/recordings", get(handlers::recordings))
    .route("/api/courses/{id}/live-classes", get(handlers::live_classes))
    .route("/api/courses/{id}/subscription", get(handlers::active_subscription))
    .route("/api/courses/{id}/trial", post(handlers::start_trial))
    .route("/api/trial", get(handlers::trial_status))
    .route("/api/admin/courses", post(handlers::create_course))
    .route("/api/admin/courses/{id}/recordings", post(handlers::add_recording))
    .route(
      "/api/admin/courses/{id}/live-classes",
      post(handlers::add_live_class),
    )
    .route(
      "/api/admin/recordings/{id}/publish",
      post(handlers::publish_recording),
    )
    .route("/api/admin/plans", post(handlers::create_plan))
    .route("/api/admin/plans/{id}/active", post(handlers::set_plan_active))
    .route(
      "/api/admin/subscriptions/{id}/status",
      post(handlers::set_subscription_status),
    )
    .route("/api/admin/payments", post(handlers::approve_payment))
    .route("/api/admin/enrollments", post(handlers::create_enrollment))
    .route("/api/admin/trials/{id}", delete(handlers::revoke_trial))
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
          .allow_origin(Any)
          .allow_methods(Any)
          .allow_headers(Any),
      ),
    )
    .with_state(app)
}

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(app.config.rate_per_second)
        .burst_size(app.config.rate_burst)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let governor_limiter = governor_conf.limiter().clone();
    let retain = app.config.rate_retain;

    tokio::spawn(async move {
      loop {
        tokio::time::sleep(retain).await;
        governor_limiter.retain_recent();
      }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));
    let service = router(app)
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HTTP Server listening on {addr}");

    tokio::spawn(async move {
      if let Err(err) = axum::serve(listener, service).await {
        error!("HTTP server stopped: {err}");
      }
    });

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use tower::ServiceExt;

  use super::*;
  use crate::{
    auth::{Claims, sign},
    config::Config,
    entity::UserRole,
  };

  const SECRET: &str = "test-secret-0123456789";

  async fn app() -> Arc<AppState> {
    let config = Config {
      database_url: "sqlite::memory:".into(),
      secret: SECRET.into(),
      port: 0,
      rate_per_second: 2,
      rate_burst: 100,
      rate_retain: Duration::from_secs(60),
    };
    Arc::new(AppState::new(config).await.unwrap())
  }

  fn token(sub: i64, role: UserRole) -> String {
    format!("Bearer {}", sign(SECRET, &Claims { sub, role }).unwrap())
  }

  async fn call(
    app: &Arc<AppState>,
    method: &str,
    uri: &str,
    auth: Option<String>,
    body: Option<json::Value>,
  ) -> (StatusCode, json::Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      req = req.header(header::AUTHORIZATION, auth);
    }

    let req = match body {
      Some(body) => req
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string())),
      None => req.body(Body::empty()),
    }
    .unwrap();

    let resp = router(app.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = json::from_slice(&bytes).unwrap_or(json::Value::Null);

    (status, value)
  }

  async fn seeded() -> (Arc<AppState>, i64) {
    let app = app().await;
    let admin = Some(token(1, UserRole::Admin));

    let (status, course) = call(
      &app,
      "POST",
      "/api/admin/courses",
      admin.clone(),
      Some(json::json!({ "title": "Rust for Beginners" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = course["id"].as_i64().unwrap();

    for title in ["ownership", "borrowing", "lifetimes"] {
      let (_, rec) = call(
        &app,
        "POST",
        &format!("/api/admin/courses/{course_id}/recordings"),
        admin.clone(),
        Some(json::json!({
          "title": title,
          "video_url": format!("https://cdn.example/{title}"),
        })),
      )
      .await;

      let id = rec["id"].as_i64().unwrap();
      let (status, _) = call(
        &app,
        "POST",
        &format!("/api/admin/recordings/{id}/publish"),
        admin.clone(),
        Some(json::json!({})),
      )
      .await;
      assert_eq!(status, StatusCode::OK);
    }

    (app, course_id)
  }

  #[tokio::test]
  async fn test_health() {
    let app = app().await;
    let resp = router(app)
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn test_guest_preview() {
    let (app, course) = seeded().await;

    let uri = format!("/api/courses/{course}/recordings");
    let (status, body) = call(&app, "GET", &uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["locked"], false);
    assert_eq!(items[0]["video_url"], "https://cdn.example/ownership");
    assert_eq!(items[1]["locked"], true);
    assert!(items[1]["video_url"].is_null());
    assert!(items[2]["video_url"].is_null());
  }

  #[tokio::test]
  async fn test_guest_has_no_live_classes() {
    let (app, course) = seeded().await;

    let (status, _) = call(
      &app,
      "GET",
      &format!("/api/courses/{course}/live-classes"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
      &app,
      "POST",
      &format!("/api/courses/{course}/trial"),
      None,
      Some(json::json!({ "resource_type": "live_class" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn test_student_trial_flow() {
    let (app, course) = seeded().await;
    let student = Some(token(10, UserRole::Student));

    let (status, body) = call(
      &app,
      "GET",
      &format!("/api/courses/{course}/recordings"),
      student.clone(),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["verdict"]["detail"]["reason"], "trial_available");

    let (status, grant) = call(
      &app,
      "POST",
      &format!("/api/courses/{course}/trial"),
      student.clone(),
      Some(json::json!({ "resource_type": "lecture_recording" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(grant["resource_type"], "lecture_recording");

    let (status, body) = call(
      &app,
      "GET",
      &format!("/api/courses/{course}/recordings"),
      student.clone(),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["items"][2]["locked"], false);

    let (_, verdict) = call(
      &app,
      "GET",
      &format!("/api/courses/{course}/access?resource=live_class"),
      student.clone(),
      None,
    )
    .await;
    assert_eq!(verdict["granted"], true);
    assert_eq!(verdict["via"], "demo");

    let (status, body) = call(
      &app,
      "POST",
      &format!("/api/courses/{course}/trial"),
      student.clone(),
      Some(json::json!({ "resource_type": "live_class" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "not_eligible");

    let (_, status_body) = call(&app, "GET", "/api/trial", student, None).await;
    assert_eq!(status_body["eligible"], false);
    assert_eq!(status_body["grants"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_admin_routes_need_role() {
    let (app, course) = seeded().await;
    let student = Some(token(10, UserRole::Student));
    let teacher = Some(token(11, UserRole::Teacher));

    let plan = json::json!({
      "name": "Monthly",
      "plan_type": "recordings_only",
      "price": 1200,
      "duration_months": 1,
    });

    let (status, _) =
      call(&app, "POST", "/api/admin/plans", teacher, Some(plan)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
      &app,
      "POST",
      "/api/admin/courses",
      student,
      Some(json::json!({ "title": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
      &app,
      "GET",
      &format!("/api/courses/{course}/access?resource=live_class"),
      Some("Bearer not-a-token".into()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn test_payment_approval() {
    let (app, course) = seeded().await;
    let admin = Some(token(1, UserRole::Admin));
    let student = Some(token(10, UserRole::Student));

    // materialize the student
    call(&app, "GET", "/api/trial", student.clone(), None).await;

    let (status, plan) = call(
      &app,
      "POST",
      "/api/admin/plans",
      admin.clone(),
      Some(json::json!({
        "name": "Live only",
        "plan_type": "live_classes_only",
        "price": 2000,
        "duration_months": 3,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let approval = json::json!({
      "user_id": 10,
      "course_id": course,
      "plan_id": plan["id"],
    });

    let (status, approved) = call(
      &app,
      "POST",
      "/api/admin/payments",
      admin.clone(),
      Some(approval.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(approved["enrollment"]["enrollment_type"], "paid");

    let (_, verdict) = call(
      &app,
      "GET",
      &format!("/api/courses/{course}/access?resource=lecture_recording"),
      student.clone(),
      None,
    )
    .await;
    assert_eq!(verdict["granted"], true);
    assert_eq!(verdict["via"], "subscription");

    let (_, active) = call(
      &app,
      "GET",
      &format!("/api/courses/{course}/subscription"),
      student,
      None,
    )
    .await;
    assert_eq!(active["plan"]["plan_type"], "live_classes_only");
    assert_eq!(active["subscription"]["status"], "active");

    let (status, body) =
      call(&app, "POST", "/api/admin/payments", admin, Some(approval)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
  }

  #[tokio::test]
  async fn test_revoke_trial() {
    let (app, course) = seeded().await;
    let admin = Some(token(1, UserRole::Admin));
    let student = Some(token(10, UserRole::Student));

    let (_, grant) = call(
      &app,
      "POST",
      &format!("/api/courses/{course}/trial"),
      student.clone(),
      Some(json::json!({ "resource_type": "live_class" })),
    )
    .await;
    let id = grant["id"].as_i64().unwrap();

    let (status, _) = call(
      &app,
      "DELETE",
      &format!("/api/admin/trials/{id}"),
      admin.clone(),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      call(&app, "DELETE", &format!("/api/admin/trials/{id}"), admin, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, "GET", "/api/trial", student, None).await;
    assert_eq!(body["eligible"], false);
  }
}
