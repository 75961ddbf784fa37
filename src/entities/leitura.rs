use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "leituras_sensores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub campo_id: i32,
    pub umidade: f64,
    pub ph: f64,
    pub nutrientes: f64,
    pub temperatura: Option<f64>,
    /// UTC ISO-8601, fixed width, assigned by the server at insert time.
    pub timestamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campo::Entity",
        from = "Column::CampoId",
        to = "super::campo::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Campo,
}

impl Related<super::campo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
