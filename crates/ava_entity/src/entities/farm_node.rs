use sea_orm::entity::prelude::*;

/// 作业农场中的工作节点
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs_farmnode")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ip_address: String,
    pub machine_name: String,
    pub status: String,
    pub last_seen: Option<DateTime>,
    pub code_version: Option<String>,
    pub req_restart: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::farm_job::Entity")]
    FarmJob,
}

impl Related<super::farm_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
