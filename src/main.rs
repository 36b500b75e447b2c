mod auth;
mod config;
mod entity;
mod error;
mod plugins;
mod prelude;
mod state;
mod sv;

use anyhow::Context;
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  auth::Claims, config::Config, entity::UserRole, prelude::*, state::AppState,
};

/// `course_access token <user_id> <role>` prints a bearer token signed with
/// `SERVER_SECRET`, for local testing without the identity provider.
fn mint_token(mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
  let sub = args
    .next()
    .context("Usage: token <user_id> <role>")?
    .parse()
    .context("Invalid user id")?;
  let role = args.next().unwrap_or_else(|| "student".into());
  let role: UserRole = json::from_value(json::Value::String(role.clone()))
    .with_context(|| format!("Unknown role '{role}'"))?;

  let secret = Config::from_env()?.secret;
  let token = auth::sign(&secret, &Claims { sub, role })
    .context("Failed to sign token")?;
  println!("{token}");
  Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  let mut args = std::env::args().skip(1);
  if let Some(cmd) = args.next() {
    return match cmd.as_str() {
      "token" => mint_token(args),
      other => anyhow::bail!("Unknown command '{other}'"),
    };
  }

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "course_access=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;

  info!("Starting Course Access Server v{}", env!("CARGO_PKG_VERSION"));

  let app = Arc::new(AppState::new(config).await?);

  plugins::App::new().register(plugins::server::Plugin).run(app).await;

  tokio::signal::ctrl_c().await?;
  info!("Shutting down");

  Ok(())
}
