use sea_orm::entity::prelude::*;

/// 状态字段 flag 的默认值，并不在其可选值 [(0, 'dummy')] 中
pub const FLAG_DEFAULT: &str = "none";

/// 归档中的一次拍摄（take）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "archive_take")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub capture_time: Option<DateTime>,
    pub comment: Option<String>,
    pub rating: i32,
    pub duration: Option<f64>,
    pub frame_count: i32,
    pub is_test: bool,
    pub flag: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// 反向访问名 ext_jobs
    #[sea_orm(has_many = "super::farm_job::Entity")]
    ExtJobs,
}

impl Related<super::farm_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExtJobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
