use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200003_create_attendance_records"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_records"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("roll_no")).string().not_null())
                    .col(ColumnDef::new(Alias::new("date")).date().not_null())
                    .col(ColumnDef::new(Alias::new("time")).time().not_null())
                    .col(ColumnDef::new(Alias::new("status")).string().not_null())
                    .col(ColumnDef::new(Alias::new("username")).string().not_null().default(""))
                    .col(ColumnDef::new(Alias::new("class_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("subject")).string().not_null())
                    .to_owned(),
            )
            .await?;

        // At most one record per (roll_no, class, subject, date). The ledger is
        // append-only; the unique index turns the check-then-insert pattern into
        // an atomic conditional insert.
        manager
            .create_index(
                Index::create()
                    .name("uq_attendance_records_key")
                    .table(Alias::new("attendance_records"))
                    .col(Alias::new("roll_no"))
                    .col(Alias::new("class_name"))
                    .col(Alias::new("subject"))
                    .col(Alias::new("date"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("attendance_records")).to_owned())
            .await
    }
}
