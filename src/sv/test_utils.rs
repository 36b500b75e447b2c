//! Shared test utilities for database setup

#[cfg(test)]
pub mod test_db {
  use std::path::Path;

  use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, DbBackend, EntityTrait, Schema, Set,
  };

  use crate::{
    entity::{UserRole, *},
    prelude::now,
  };

  async fn create<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let schema = Schema::new(DbBackend::Sqlite);
    let stmt = schema.create_table_from_entity(entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();
  }

  /// Creates an in-memory SQLite database with all required tables
  pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    tables(&db).await;
    db
  }

  /// File-backed database behind a pool of `connections`, for tests where
  /// requests must really run concurrently.
  pub async fn setup_file(dir: &Path, connections: u32) -> DatabaseConnection {
    let url = format!("sqlite://{}?mode=rwc", dir.join("test.db").display());
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(connections).sqlx_logging(false);

    let db = Database::connect(opts).await.unwrap();
    tables(&db).await;
    db
  }

  async fn tables(db: &DatabaseConnection) {
    create(db, user::Entity).await;
    create(db, course::Entity).await;
    create(db, plan::Entity).await;
    create(db, subscription::Entity).await;
    create(db, enrollment::Entity).await;
    create(db, trial_grant::Entity).await;
    create(db, recording::Entity).await;
    create(db, live_class::Entity).await;
  }

  pub async fn student(db: &DatabaseConnection, id: i64) -> user::Model {
    user::ActiveModel {
      id: Set(id),
      role: Set(UserRole::Student),
      trial_used: Set(false),
      created_at: Set(now()),
    }
    .insert(db)
    .await
    .unwrap()
  }

  pub async fn course(db: &DatabaseConnection, title: &str) -> course::Model {
    course::ActiveModel {
      title: Set(title.to_string()),
      description: Set(None),
      created_at: Set(now()),
      ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
  }
}
