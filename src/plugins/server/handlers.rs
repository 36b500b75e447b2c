use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::auth::{Caller, MaybeCaller};
use crate::{
  entity::{
    ResourceType, SubscriptionStatus, course, enrollment, live_class, plan,
    subscription, trial_grant,
  },
  prelude::*,
  state::AppState,
  sv::{
    entitlement::Verdict,
    live_class::NewLiveClass,
    payment::{Approval, Approved},
    plan::NewPlan,
    preview::RecordingView,
    recording::NewRecording,
  },
};

type App = State<Arc<AppState>>;

pub async fn health() -> &'static str {
  "ok"
}

pub async fn plans(State(app): App) -> Result<Json<Vec<plan::Model>>> {
  Ok(Json(app.sv().plan.active().await?))
}

pub async fn courses(State(app): App) -> Result<Json<Vec<course::Model>>> {
  Ok(Json(app.sv().course.all().await?))
}

#[derive(Deserialize)]
pub struct AccessQuery {
  resource: ResourceType,
}

pub async fn access(
  State(app): App,
  caller: Caller,
  Path(course_id): Path<i64>,
  Query(query): Query<AccessQuery>,
) -> Result<Json<Verdict>> {
  let sv = app.sv();
  sv.course.require(course_id).await?;

  Ok(Json(sv.entitlement.resolve(caller.id(), course_id, query.resource).await))
}

#[derive(Serialize)]
struct Denied {
  verdict: Verdict,
}

fn denied(verdict: Verdict) -> Response {
  (StatusCode::FORBIDDEN, Json(Denied { verdict })).into_response()
}

#[derive(Serialize)]
struct Listing<T> {
  verdict: Option<Verdict>,
  items: Vec<T>,
}

pub async fn recordings(
  State(app): App,
  MaybeCaller(caller): MaybeCaller,
  Path(course_id): Path<i64>,
) -> Result<Response> {
  let sv = app.sv();

  let Some(caller) = caller else {
    let items = sv.preview.guest(course_id).await?;
    return Ok(Json(Listing { verdict: None, items }).into_response());
  };

  sv.course.require(course_id).await?;
  let verdict = sv
    .entitlement
    .resolve(caller.id(), course_id, ResourceType::LectureRecording)
    .await;

  if !verdict.granted {
    return Ok(denied(verdict));
  }

  let items: Vec<_> = sv
    .recording
    .published(course_id)
    .await?
    .into_iter()
    .map(RecordingView::unlocked)
    .collect();

  Ok(Json(Listing { verdict: Some(verdict), items }).into_response())
}

pub async fn live_classes(
  State(app): App,
  caller: Caller,
  Path(course_id): Path<i64>,
) -> Result<Response> {
  let sv = app.sv();
  sv.course.require(course_id).await?;

  let verdict = sv
    .entitlement
    .resolve(caller.id(), course_id, ResourceType::LiveClass)
    .await;

  if !verdict.granted {
    return Ok(denied(verdict));
  }

  let items: Vec<live_class::Model> = sv.live_class.by_course(course_id).await?;
  Ok(Json(Listing { verdict: Some(verdict), items }).into_response())
}

#[derive(Serialize)]
pub struct ActiveSubscription {
  subscription: subscription::Model,
  plan: plan::Model,
}

pub async fn active_subscription(
  State(app): App,
  caller: Caller,
  Path(course_id): Path<i64>,
) -> Result<Json<Option<ActiveSubscription>>> {
  let active =
    app.sv().subscription.active(caller.id(), course_id, now()).await?;

  Ok(Json(active.map(|(subscription, plan)| {
    ActiveSubscription { subscription, plan }
  })))
}

#[derive(Serialize)]
pub struct TrialStatus {
  eligible: bool,
  grants: Vec<trial_grant::Model>,
}

pub async fn trial_status(
  State(app): App,
  caller: Caller,
) -> Result<Json<TrialStatus>> {
  let sv = app.sv();

  Ok(Json(TrialStatus {
    eligible: sv.trial.is_eligible(caller.id()).await?,
    grants: sv.trial.by_user(caller.id()).await?,
  }))
}

#[derive(Deserialize)]
pub struct StartTrial {
  resource_type: ResourceType,
}

pub async fn start_trial(
  State(app): App,
  caller: Caller,
  Path(course_id): Path<i64>,
  Json(req): Json<StartTrial>,
) -> Result<(StatusCode, Json<trial_grant::Model>)> {
  let grant =
    app.sv().trial.grant(caller.id(), course_id, req.resource_type).await?;

  Ok((StatusCode::CREATED, Json(grant)))
}

#[derive(Deserialize)]
pub struct NewCourse {
  title: String,
  description: Option<String>,
}

pub async fn create_course(
  State(app): App,
  caller: Caller,
  Json(req): Json<NewCourse>,
) -> Result<(StatusCode, Json<course::Model>)> {
  caller.staff()?;

  let course = app.sv().course.create(req.title, req.description).await?;
  info!("course #{} created by {}", course.id, caller.id());

  Ok((StatusCode::CREATED, Json(course)))
}

pub async fn add_recording(
  State(app): App,
  caller: Caller,
  Path(course_id): Path<i64>,
  Json(req): Json<NewRecording>,
) -> Result<(StatusCode, Json<RecordingView>)> {
  caller.staff()?;

  let sv = app.sv();
  sv.course.require(course_id).await?;
  let recording = sv.recording.create(course_id, req).await?;

  Ok((StatusCode::CREATED, Json(RecordingView::unlocked(recording))))
}

#[derive(Deserialize)]
pub struct Publish {
  #[serde(default = "yes")]
  published: bool,
}

fn yes() -> bool {
  true
}

pub async fn publish_recording(
  State(app): App,
  caller: Caller,
  Path(id): Path<i64>,
  Json(req): Json<Publish>,
) -> Result<Json<RecordingView>> {
  caller.staff()?;

  let recording = app.sv().recording.set_published(id, req.published).await?;
  Ok(Json(RecordingView::unlocked(recording)))
}

pub async fn add_live_class(
  State(app): App,
  caller: Caller,
  Path(course_id): Path<i64>,
  Json(req): Json<NewLiveClass>,
) -> Result<(StatusCode, Json<live_class::Model>)> {
  caller.staff()?;

  let sv = app.sv();
  sv.course.require(course_id).await?;

  Ok((StatusCode::CREATED, Json(sv.live_class.create(course_id, req).await?)))
}

pub async fn create_plan(
  State(app): App,
  caller: Caller,
  Json(req): Json<NewPlan>,
) -> Result<(StatusCode, Json<plan::Model>)> {
  caller.admin()?;

  Ok((StatusCode::CREATED, Json(app.sv().plan.create(req).await?)))
}

#[derive(Deserialize)]
pub struct PlanActive {
  active: bool,
}

pub async fn set_plan_active(
  State(app): App,
  caller: Caller,
  Path(id): Path<i64>,
  Json(req): Json<PlanActive>,
) -> Result<Json<plan::Model>> {
  caller.admin()?;

  Ok(Json(app.sv().plan.set_active(id, req.active).await?))
}

#[derive(Deserialize)]
pub struct SetStatus {
  status: SubscriptionStatus,
}

pub async fn set_subscription_status(
  State(app): App,
  caller: Caller,
  Path(id): Path<i64>,
  Json(req): Json<SetStatus>,
) -> Result<Json<subscription::Model>> {
  caller.admin()?;

  Ok(Json(app.sv().subscription.set_status(id, req.status).await?))
}

pub async fn approve_payment(
  State(app): App,
  caller: Caller,
  Json(req): Json<Approval>,
) -> Result<(StatusCode, Json<Approved>)> {
  caller.admin()?;

  Ok((StatusCode::CREATED, Json(app.sv().payment.approve(req).await?)))
}

#[derive(Deserialize)]
pub struct NewEnrollment {
  user_id: i64,
  course_id: i64,
  subscription_id: Option<i64>,
}

pub async fn create_enrollment(
  State(app): App,
  caller: Caller,
  Json(req): Json<NewEnrollment>,
) -> Result<(StatusCode, Json<enrollment::Model>)> {
  caller.admin()?;

  let sv = app.sv();
  sv.user.require(req.user_id).await?;
  sv.course.require(req.course_id).await?;

  let enrollment = sv
    .enrollment
    .create_paid(req.user_id, req.course_id, req.subscription_id)
    .await?;

  Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn revoke_trial(
  State(app): App,
  caller: Caller,
  Path(id): Path<i64>,
) -> Result<StatusCode> {
  caller.admin()?;

  app.sv().trial.revoke(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
