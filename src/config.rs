use std::env;

use anyhow::Context;

use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  /// Shared with the identity provider to verify bearer tokens.
  pub secret: String,
  pub port: u16,
  pub rate_per_second: u64,
  pub rate_burst: u32,
  pub rate_retain: Duration,
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let secret = env::var("SERVER_SECRET").context("SERVER_SECRET not set")?;
    if secret.len() < 16 {
      anyhow::bail!("SERVER_SECRET must be at least 16 bytes");
    }

    let rate_retain = match env::var("RATE_LIMIT_RETAIN") {
      Ok(raw) => humantime::parse_duration(&raw)
        .with_context(|| format!("Invalid RATE_LIMIT_RETAIN '{raw}'"))?,
      Err(_) => Duration::from_secs(60),
    };

    Ok(Self {
      database_url: env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:academy.db?mode=rwc".into()),
      secret,
      port: parse_or("PORT", 3000)?,
      rate_per_second: parse_or("RATE_LIMIT_PER_SECOND", 2)?,
      rate_burst: parse_or("RATE_LIMIT_BURST", 100)?,
      rate_retain,
    })
  }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
  T: std::str::FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match env::var(key) {
    Ok(raw) => {
      raw.trim().parse().with_context(|| format!("Invalid {key} '{raw}'"))
    }
    Err(_) => Ok(default),
  }
}
