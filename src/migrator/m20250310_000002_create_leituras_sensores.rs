use sea_orm_migration::prelude::*;

use super::m20250310_000001_create_campos::Campos;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeiturasSensores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeiturasSensores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeiturasSensores::CampoId).integer().not_null())
                    .col(ColumnDef::new(LeiturasSensores::Umidade).double().not_null())
                    .col(ColumnDef::new(LeiturasSensores::Ph).double().not_null())
                    .col(ColumnDef::new(LeiturasSensores::Nutrientes).double().not_null())
                    .col(ColumnDef::new(LeiturasSensores::Temperatura).double())
                    .col(ColumnDef::new(LeiturasSensores::Timestamp).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-leitura-campo_id")
                            .from(LeiturasSensores::Table, LeiturasSensores::CampoId)
                            .to(Campos::Table, Campos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves both "latest N for a field" and the chart series.
        manager
            .create_index(
                Index::create()
                    .name("idx_leituras_campo_timestamp")
                    .table(LeiturasSensores::Table)
                    .if_not_exists()
                    .col(LeiturasSensores::CampoId)
                    .col(LeiturasSensores::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_leituras_campo_timestamp")
                    .table(LeiturasSensores::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(LeiturasSensores::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LeiturasSensores {
    Table,
    Id,
    CampoId,
    Umidade,
    Ph,
    Nutrientes,
    Temperatura,
    Timestamp,
}
