use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Trial {
  #[error("trial already used")]
  NotEligible,
  #[error("trial already running for this resource")]
  DuplicatePending,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("storage unavailable: {0}")]
  Db(#[from] sea_orm::DbErr),
  #[error(transparent)]
  Trial(#[from] Trial),
  #[error("enrollment already exists")]
  Conflict,
  #[error("user not found")]
  UserNotFound,
  #[error("course not found")]
  CourseNotFound,
  #[error("plan not found")]
  PlanNotFound,
  #[error("subscription not found")]
  SubscriptionNotFound,
  #[error("trial grant not found")]
  GrantNotFound,
  #[error("recording not found")]
  RecordingNotFound,
  #[error("missing or invalid credentials")]
  Unauthorized,
  #[error("insufficient role")]
  Forbidden,
  #[error("invalid arguments: {0}")]
  InvalidArgs(String),
}

impl Error {
  pub fn code(&self) -> &'static str {
    match self {
      Error::Db(_) => "storage_unavailable",
      Error::Trial(Trial::NotEligible) => "not_eligible",
      Error::Trial(Trial::DuplicatePending) => "duplicate_pending",
      Error::Conflict => "conflict",
      Error::UserNotFound => "user_not_found",
      Error::CourseNotFound => "course_not_found",
      Error::PlanNotFound => "plan_not_found",
      Error::SubscriptionNotFound => "subscription_not_found",
      Error::GrantNotFound => "grant_not_found",
      Error::RecordingNotFound => "recording_not_found",
      Error::Unauthorized => "unauthorized",
      Error::Forbidden => "forbidden",
      Error::InvalidArgs(_) => "invalid_args",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::Db(_) => StatusCode::SERVICE_UNAVAILABLE,
      Error::Trial(_) | Error::Conflict => StatusCode::CONFLICT,
      Error::UserNotFound
      | Error::CourseNotFound
      | Error::PlanNotFound
      | Error::SubscriptionNotFound
      | Error::GrantNotFound
      | Error::RecordingNotFound => StatusCode::NOT_FOUND,
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::Forbidden => StatusCode::FORBIDDEN,
      Error::InvalidArgs(_) => StatusCode::BAD_REQUEST,
    }
  }

  /// Message safe to show to the caller. Storage details stay in the logs.
  pub fn user_message(&self) -> String {
    match self {
      Error::Db(_) => "Service temporarily unavailable".into(),
      Error::Trial(Trial::NotEligible) => {
        "Your free trial has already been used".into()
      }
      Error::Trial(Trial::DuplicatePending) => {
        "You already have an active trial for this content".into()
      }
      other => other.to_string(),
    }
  }
}

#[derive(Serialize)]
struct ErrorBody {
  error: &'static str,
  message: String,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match &self {
      Error::Db(err) => tracing::error!("storage failure: {err}"),
      Error::Trial(reason) => tracing::debug!("trial refused: {reason}"),
      _ => {}
    }

    let body = ErrorBody { error: self.code(), message: self.user_message() };
    (self.status(), Json(body)).into_response()
  }
}
