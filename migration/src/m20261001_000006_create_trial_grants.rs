use sea_orm_migration::prelude::*;

use super::{
  m20261001_000001_create_users::Users,
  m20261001_000002_create_courses::Courses,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(TrialGrants::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(TrialGrants::Id)
              .big_integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(TrialGrants::UserId).big_integer().not_null())
          .col(ColumnDef::new(TrialGrants::CourseId).big_integer().not_null())
          .col(ColumnDef::new(TrialGrants::ResourceType).string().not_null())
          .col(ColumnDef::new(TrialGrants::UsedAt).date_time().not_null())
          .col(ColumnDef::new(TrialGrants::ExpiresAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_trial_grants_user")
              .from(TrialGrants::Table, TrialGrants::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_trial_grants_course")
              .from(TrialGrants::Table, TrialGrants::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_trial_grants_scope")
          .table(TrialGrants::Table)
          .col(TrialGrants::UserId)
          .col(TrialGrants::CourseId)
          .col(TrialGrants::ResourceType)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(TrialGrants::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum TrialGrants {
  Table,
  Id,
  UserId,
  CourseId,
  ResourceType,
  UsedAt,
  ExpiresAt,
}
