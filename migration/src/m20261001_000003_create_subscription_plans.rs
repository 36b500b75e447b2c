use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(SubscriptionPlans::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SubscriptionPlans::Id)
              .big_integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(SubscriptionPlans::Name).string().not_null())
          .col(ColumnDef::new(SubscriptionPlans::PlanType).string().not_null())
          .col(
            ColumnDef::new(SubscriptionPlans::Price)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(SubscriptionPlans::DurationMonths).integer().null(),
          )
          .col(ColumnDef::new(SubscriptionPlans::CutoffAt).date_time().null())
          .col(
            ColumnDef::new(SubscriptionPlans::IsActive)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(
            ColumnDef::new(SubscriptionPlans::CreatedAt)
              .date_time()
              .not_null(),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(SubscriptionPlans::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum SubscriptionPlans {
  Table,
  Id,
  Name,
  PlanType,
  Price,
  DurationMonths,
  CutoffAt,
  IsActive,
  CreatedAt,
}
