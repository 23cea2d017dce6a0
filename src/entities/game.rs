use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::store::{Game, GameId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub platform: String,
    pub release_year: i32,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub completed: bool,
    #[sea_orm(column_type = "Double")]
    pub playtime_hours: f64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Game {
    fn from(model: Model) -> Self {
        Self {
            id: GameId::Int(model.id),
            title: model.title,
            platform: model.platform,
            release_year: model.release_year,
            price: model.price,
            completed: model.completed,
            playtime_hours: model.playtime_hours,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
