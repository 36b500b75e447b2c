use sea_orm_migration::prelude::*;

use super::{
  m20261001_000001_create_users::Users,
  m20261001_000002_create_courses::Courses,
  m20261001_000004_create_subscriptions::Subscriptions,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Enrollments::Table)
          .if_not_exists()
          .col(ColumnDef::new(Enrollments::UserId).big_integer().not_null())
          .col(ColumnDef::new(Enrollments::CourseId).big_integer().not_null())
          .col(ColumnDef::new(Enrollments::EnrollmentType).string().not_null())
          .col(ColumnDef::new(Enrollments::SubscriptionId).big_integer().null())
          .col(ColumnDef::new(Enrollments::CreatedAt).date_time().not_null())
          // one membership row per (user, course)
          .primary_key(
            Index::create()
              .col(Enrollments::UserId)
              .col(Enrollments::CourseId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_enrollments_user")
              .from(Enrollments::Table, Enrollments::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_enrollments_course")
              .from(Enrollments::Table, Enrollments::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_enrollments_subscription")
              .from(Enrollments::Table, Enrollments::SubscriptionId)
              .to(Subscriptions::Table, Subscriptions::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Enrollments::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Enrollments {
  Table,
  UserId,
  CourseId,
  EnrollmentType,
  SubscriptionId,
  CreatedAt,
}
