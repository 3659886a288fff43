use sea_orm::entity::prelude::*;

/// 提交到作业农场的作业
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs_farmjob")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_class: String,
    pub created: DateTime,
    pub modified: DateTime,
    pub status: String,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
    pub exception: Option<String>,
    pub node_id: Option<i32>,
    pub params: Option<String>,
    pub progress: Option<String>,
    pub ext_take_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// 节点删除时作业随之删除
    #[sea_orm(
        belongs_to = "super::farm_node::Entity",
        from = "Column::NodeId",
        to = "super::farm_node::Column::Id",
        on_delete = "Cascade"
    )]
    FarmNode,
    /// 素材删除时仅清空 ext_take_id
    #[sea_orm(
        belongs_to = "super::take::Entity",
        from = "Column::ExtTakeId",
        to = "super::take::Column::Id",
        on_delete = "SetNull"
    )]
    ExtTake,
}

impl Related<super::farm_node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmNode.def()
    }
}

impl Related<super::take::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExtTake.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
