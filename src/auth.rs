//! Bearer tokens minted by the identity provider: HS256 JWTs carrying the
//! user id and role.

use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

use crate::{entity::UserRole, prelude::*};

/// Lifetime of a freshly minted token.
pub const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claims {
  pub sub: i64,
  pub role: UserRole,
}

#[derive(Serialize, Deserialize)]
struct TokenClaims {
  sub: String,
  role: UserRole,
  iat: i64,
  exp: i64,
}

pub fn sign(
  secret: &str,
  claims: &Claims,
) -> jsonwebtoken::errors::Result<String> {
  sign_for(secret, claims, TimeDelta::hours(TOKEN_TTL_HOURS))
}

pub fn sign_for(
  secret: &str,
  claims: &Claims,
  ttl: TimeDelta,
) -> jsonwebtoken::errors::Result<String> {
  let now = Utc::now();
  let token = TokenClaims {
    sub: claims.sub.to_string(),
    role: claims.role,
    iat: now.timestamp(),
    exp: (now + ttl).timestamp(),
  };

  encode(
    &Header::new(Algorithm::HS256),
    &token,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
}

pub fn verify(secret: &str, token: &str) -> Result<Claims> {
  let key = DecodingKey::from_secret(secret.as_bytes());
  let validation = Validation::new(Algorithm::HS256);

  let data = decode::<TokenClaims>(token, &key, &validation).map_err(|err| {
    debug!("rejected bearer token: {err}");
    Error::Unauthorized
  })?;

  let sub = data.claims.sub.parse().map_err(|_| Error::Unauthorized)?;
  Ok(Claims { sub, role: data.claims.role })
}
