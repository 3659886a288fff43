pub use sea_orm_migration::prelude::*;
use tracing::error;

mod archive;
mod jobs;
pub mod schema;

pub use schema::apply::DeclaredMigration;
pub use schema::validate::{check, SchemaError, Strictness};

/// 全部迁移记录，按可执行顺序声明
pub static REGISTRY: &[&schema::Migration] = &[
    &jobs::m0001_initial::MIGRATION,
    &jobs::m0002_auto_20161011_1336::MIGRATION,
    &jobs::m0003_auto_20161011_1359::MIGRATION,
    &archive::m0001_initial::MIGRATION,
    &archive::m0007_auto_20170320_1532::MIGRATION,
    &jobs::m0009_farmjob_progress::MIGRATION,
    &jobs::m0010_farmjob_ext_take::MIGRATION,
    &archive::m0011_auto_20170405_1049::MIGRATION,
    &archive::m0012_take_flag::MIGRATION,
];

/// 按依赖关系排好序的迁移记录
pub fn ordered() -> Vec<&'static schema::Migration> {
    match schema::graph::plan(REGISTRY) {
        Ok(ordered) => ordered,
        Err(e) => {
            // 注册表由测试保证可排序，这里退回声明顺序
            error!("迁移依赖图无效: {}", e);
            REGISTRY.to_vec()
        }
    }
}

fn declared(strictness: Strictness) -> Vec<Box<dyn MigrationTrait>> {
    ordered()
        .into_iter()
        .map(|record| Box::new(DeclaredMigration::new(record, strictness)) as Box<dyn MigrationTrait>)
        .collect()
}

/// 默认迁移器，尊重字段上的 `no_check_for_status`
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        declared(Strictness::Lenient)
    }
}

/// 严格迁移器，状态字段默认值不在可选值中时拒绝执行
pub struct StrictMigrator;

#[async_trait::async_trait]
impl MigratorTrait for StrictMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        declared(Strictness::Strict)
    }
}
