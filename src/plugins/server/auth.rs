use axum::{
  extract::FromRequestParts,
  http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
  auth,
  entity::{UserRole, user},
  prelude::*,
  state::AppState,
};

/// Authenticated caller. Rejects guests with 401.
#[derive(Debug, Clone)]
pub struct Caller {
  pub user: user::Model,
}

impl Caller {
  pub fn id(&self) -> i64 {
    self.user.id
  }

  pub fn role(&self) -> UserRole {
    self.user.role
  }

  pub fn staff(&self) -> Result<()> {
    if self.role().can_manage_content() {
      Ok(())
    } else {
      Err(Error::Forbidden)
    }
  }

  pub fn admin(&self) -> Result<()> {
    if self.role().is_admin() { Ok(()) } else { Err(Error::Forbidden) }
  }
}

/// Caller that may be a guest. A present but invalid token is still a 401.
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<Caller>);

impl FromRequestParts<Arc<AppState>> for MaybeCaller {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
      return Ok(Self(None));
    };

    let token = header
      .to_str()
      .ok()
      .and_then(|value| value.strip_prefix("Bearer "))
      .ok_or(Error::Unauthorized)?;

    let claims = auth::verify(&app.config.secret, token.trim())?;
    let user = app.sv().user.get_or_create(claims.sub, claims.role).await?;

    Ok(Self(Some(Caller { user })))
  }
}

impl FromRequestParts<Arc<AppState>> for Caller {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self> {
    let MaybeCaller(caller) =
      MaybeCaller::from_request_parts(parts, app).await?;
    caller.ok_or(Error::Unauthorized)
  }
}
