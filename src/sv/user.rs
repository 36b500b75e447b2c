use crate::{
  entity::{user, user::UserRole},
  prelude::*,
};

pub struct User<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> User<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// Users are owned by the identity provider; the first authenticated
  /// request materializes the row and later ones keep the role in sync.
  pub async fn get_or_create(
    &self,
    id: i64,
    role: UserRole,
  ) -> Result<user::Model> {
    if let Some(user) = user::Entity::find_by_id(id).one(self.db).await? {
      if user.role == role {
        return Ok(user);
      }

      debug!("user {id} role changed {:?} -> {:?}", user.role, role);
      return Ok(
        user::ActiveModel { role: Set(role), ..user.into() }
          .update(self.db)
          .await?,
      );
    }

    let user = user::ActiveModel {
      id: Set(id),
      role: Set(role),
      trial_used: Set(false),
      created_at: Set(now()),
    };

    Ok(user.insert(self.db).await?)
  }

  pub async fn by_id(&self, id: i64) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn require(&self, id: i64) -> Result<user::Model> {
    self.by_id(id).await?.ok_or(Error::UserNotFound)
  }
}
