use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campos::Nome).string().not_null())
                    .col(ColumnDef::new(Campos::Cultura).string().not_null())
                    .col(ColumnDef::new(Campos::Largura).double().not_null())
                    .col(ColumnDef::new(Campos::Comprimento).double().not_null())
                    .col(ColumnDef::new(Campos::AreaM2).double().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Campos {
    Table,
    Id,
    Nome,
    Cultura,
    Largura,
    Comprimento,
    #[sea_orm(iden = "area_m2")]
    AreaM2,
}
