use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "borrow_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub equipment_id: String,
    pub user_id: String,
    pub user_name: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub status: String,
    pub request_date: DateTimeWithTimeZone,
    pub approved_date: Option<DateTimeWithTimeZone>,
    pub return_date: Option<DateTimeWithTimeZone>,
    pub approved_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
