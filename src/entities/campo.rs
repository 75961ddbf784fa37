use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "campos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub cultura: String,
    pub largura: f64,
    pub comprimento: f64,
    // Always largura * comprimento as computed at creation.
    pub area_m2: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::leitura::Entity")]
    Leitura,
}

impl Related<super::leitura::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leitura.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
