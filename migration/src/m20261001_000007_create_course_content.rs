use sea_orm_migration::prelude::*;

use super::m20261001_000002_create_courses::Courses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(LectureRecordings::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(LectureRecordings::Id)
              .big_integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(LectureRecordings::CourseId)
              .big_integer()
              .not_null(),
          )
          .col(ColumnDef::new(LectureRecordings::Title).string().not_null())
          .col(ColumnDef::new(LectureRecordings::Description).text().null())
          .col(ColumnDef::new(LectureRecordings::DurationSecs).integer().null())
          .col(ColumnDef::new(LectureRecordings::VideoUrl).string().not_null())
          .col(
            ColumnDef::new(LectureRecordings::IsPublished)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(LectureRecordings::CreatedAt)
              .date_time()
              .not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_lecture_recordings_course")
              .from(LectureRecordings::Table, LectureRecordings::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_lecture_recordings_course")
          .table(LectureRecordings::Table)
          .col(LectureRecordings::CourseId)
          .col(LectureRecordings::CreatedAt)
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(LiveClasses::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(LiveClasses::Id)
              .big_integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(LiveClasses::CourseId).big_integer().not_null())
          .col(ColumnDef::new(LiveClasses::Title).string().not_null())
          .col(ColumnDef::new(LiveClasses::StartsAt).date_time().not_null())
          .col(ColumnDef::new(LiveClasses::MeetingUrl).string().not_null())
          .col(ColumnDef::new(LiveClasses::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_live_classes_course")
              .from(LiveClasses::Table, LiveClasses::CourseId)
              .to(Courses::Table, Courses::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(LiveClasses::Table).to_owned())
      .await?;

    manager
      .drop_table(Table::drop().table(LectureRecordings::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum LectureRecordings {
  Table,
  Id,
  CourseId,
  Title,
  Description,
  DurationSecs,
  VideoUrl,
  IsPublished,
  CreatedAt,
}

#[derive(DeriveIden)]
pub enum LiveClasses {
  Table,
  Id,
  CourseId,
  Title,
  StartsAt,
  MeetingUrl,
  CreatedAt,
}
