//! 将迁移记录渲染为 sea-orm-migration 的结构语句

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};
use tracing::debug;

use super::validate::{self, Strictness};
use super::{DefaultValue, Field, FieldKind, ForeignKey as ForeignKeySpec, Migration as Record, Operation, OnDelete};

/// 以 sea-orm 迁移的形式执行一条声明式记录
pub struct DeclaredMigration {
    record: &'static Record,
    strictness: Strictness,
    label: String,
}

impl DeclaredMigration {
    pub fn new(record: &'static Record, strictness: Strictness) -> Self {
        Self {
            record,
            strictness,
            label: record.label(),
        }
    }

    pub fn record(&self) -> &'static Record {
        self.record
    }
}

impl MigrationName for DeclaredMigration {
    fn name(&self) -> &str {
        &self.label
    }
}

#[async_trait::async_trait]
impl MigrationTrait for DeclaredMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 校验失败时该记录的任何操作都不会执行
        validate::check_migration(self.record, self.strictness).map_err(|e| DbErr::Migration(e.to_string()))?;

        for operation in self.record.operations {
            debug!("{}: {}", self.label, operation.describe());
            apply_operation(manager, self.record.app, operation).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for operation in self.record.operations.iter().rev() {
            debug!("{}: 回滚 {}", self.label, operation.describe());
            revert_operation(manager, self.record.app, operation).await?;
        }
        Ok(())
    }
}

fn column_def(field: &Field) -> ColumnDef {
    let mut def = ColumnDef::new(Alias::new(field.name));
    match field.kind {
        FieldKind::AutoPk => {
            def.integer().not_null().auto_increment().primary_key();
            return def;
        }
        FieldKind::Char { max_length } | FieldKind::Status { max_length, .. } => {
            def.string_len(max_length);
        }
        FieldKind::Integer => {
            def.integer();
        }
        FieldKind::Boolean => {
            def.boolean();
        }
        FieldKind::Float => {
            def.double();
        }
        FieldKind::DateTime => {
            def.date_time();
        }
    }

    if field.null {
        def.null();
    } else {
        def.not_null();
    }

    match field.default {
        // 可空列默认即为 NULL
        DefaultValue::None | DefaultValue::Null => {}
        DefaultValue::Text(value) => {
            def.default(value);
        }
        DefaultValue::Int(value) => {
            def.default(value);
        }
        DefaultValue::Bool(value) => {
            def.default(value);
        }
        DefaultValue::CurrentTimestamp => {
            def.default(Expr::current_timestamp());
        }
    }
    def
}

fn foreign_key_action(on_delete: OnDelete) -> ForeignKeyAction {
    match on_delete {
        OnDelete::Cascade => ForeignKeyAction::Cascade,
        OnDelete::SetNull => ForeignKeyAction::SetNull,
    }
}

async fn apply_operation(manager: &SchemaManager<'_>, app: &str, operation: &Operation) -> Result<(), DbErr> {
    let table = operation.table(app);
    match operation {
        Operation::CreateModel { fields, .. } => {
            let mut stmt = Table::create();
            stmt.table(Alias::new(&table)).if_not_exists();
            for field in *fields {
                stmt.col(column_def(field));
            }
            manager.create_table(stmt).await
        }
        Operation::AddField { field, .. } => {
            if manager.has_column(&table, field.name).await? {
                debug!("{}.{} 已存在，跳过", table, field.name);
                return Ok(());
            }
            manager
                .alter_table(
                    Table::alter()
                        .table(Alias::new(&table))
                        .add_column(column_def(field))
                        .to_owned(),
                )
                .await
        }
        Operation::AddForeignKey { field, .. } => add_foreign_key(manager, &table, field).await,
    }
}

async fn add_foreign_key(manager: &SchemaManager<'_>, table: &str, field: &ForeignKeySpec) -> Result<(), DbErr> {
    let column = field.column();
    if manager.has_column(table, &column).await? {
        debug!("{}.{} 已存在，跳过", table, column);
        return Ok(());
    }
    let target = field.to.table();

    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            // SQLite 不支持给已有表追加外键约束，只能随新列一起内联声明
            let sql = format!(
                r#"ALTER TABLE "{}" ADD COLUMN "{}" integer{} REFERENCES "{}" ("id") ON DELETE {}"#,
                table,
                column,
                if field.null { " NULL" } else { " NOT NULL" },
                target,
                field.on_delete.sql(),
            );
            manager.get_connection().execute_unprepared(&sql).await?;
            Ok(())
        }
        _ => {
            let mut def = ColumnDef::new(Alias::new(&column));
            def.integer();
            if field.null {
                def.null();
            } else {
                def.not_null();
            }
            manager
                .alter_table(Table::alter().table(Alias::new(table)).add_column(def).to_owned())
                .await?;
            manager
                .create_foreign_key(
                    ForeignKey::create()
                        .name(field.constraint_name(table))
                        .from(Alias::new(table), Alias::new(&column))
                        .to(Alias::new(&target), Alias::new("id"))
                        .on_delete(foreign_key_action(field.on_delete))
                        .to_owned(),
                )
                .await
        }
    }
}

async fn drop_column(manager: &SchemaManager<'_>, table: &str, column: &str) -> Result<(), DbErr> {
    if !manager.has_column(table, column).await? {
        return Ok(());
    }
    manager
        .alter_table(Table::alter().table(Alias::new(table)).drop_column(Alias::new(column)).to_owned())
        .await
}

async fn revert_operation(manager: &SchemaManager<'_>, app: &str, operation: &Operation) -> Result<(), DbErr> {
    let table = operation.table(app);
    match operation {
        Operation::CreateModel { .. } => {
            manager
                .drop_table(Table::drop().table(Alias::new(&table)).if_exists().to_owned())
                .await
        }
        Operation::AddField { field, .. } => drop_column(manager, &table, field.name).await,
        Operation::AddForeignKey { field, .. } => {
            if manager.get_database_backend() != DatabaseBackend::Sqlite {
                manager
                    .drop_foreign_key(
                        ForeignKey::drop()
                            .name(field.constraint_name(&table))
                            .table(Alias::new(&table))
                            .to_owned(),
                    )
                    .await?;
            }
            drop_column(manager, &table, &field.column()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::sea_orm::{Database, DatabaseConnection, Statement};

    use super::*;
    use crate::{Migrator, StrictMigrator};

    async fn memory_db() -> DatabaseConnection {
        Database::connect("sqlite::memory:").await.unwrap()
    }

    async fn column_sql(db: &DatabaseConnection, table: &str) -> String {
        let row = db
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = '{}'", table),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get_by_index::<String>(0).unwrap()
    }

    #[tokio::test]
    async fn test_lenient_migrator_applies_all() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();

        let manager = SchemaManager::new(&db);
        for (table, column) in [
            ("jobs_farmjob", "exception"),
            ("jobs_farmjob", "node_id"),
            ("jobs_farmjob", "params"),
            ("jobs_farmjob", "progress"),
            ("jobs_farmjob", "ext_take_id"),
            ("jobs_farmnode", "req_restart"),
            ("archive_take", "frame_count"),
            ("archive_take", "flag"),
        ] {
            assert!(manager.has_column(table, column).await.unwrap(), "{}.{}", table, column);
        }

        let pending = Migrator::get_pending_migrations(&db).await.unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_keys_carry_delete_policy() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();

        let sql = column_sql(&db, "jobs_farmjob").await;
        assert!(sql.contains(r#""node_id" integer NULL REFERENCES "jobs_farmnode" ("id") ON DELETE CASCADE"#));
        assert!(sql.contains(r#""ext_take_id" integer NULL REFERENCES "archive_take" ("id") ON DELETE SET NULL"#));
    }

    #[tokio::test]
    async fn test_strict_migrator_reports_flag_mismatch() {
        let db = memory_db().await;
        let err = StrictMigrator::up(&db, None).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("archive.0012_take_flag"), "{}", message);
        assert!(message.contains("配置不一致"), "{}", message);

        let manager = SchemaManager::new(&db);
        assert!(!manager.has_column("archive_take", "flag").await.unwrap());
    }

    #[tokio::test]
    async fn test_rollback_last_drops_flag() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();
        Migrator::down(&db, Some(1)).await.unwrap();

        let manager = SchemaManager::new(&db);
        assert!(!manager.has_column("archive_take", "flag").await.unwrap());
        assert!(manager.has_column("archive_take", "is_test").await.unwrap());

        let pending = Migrator::get_pending_migrations(&db).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name(), "archive.0012_take_flag");

        // 重新应用后恢复
        Migrator::up(&db, None).await.unwrap();
        assert!(manager.has_column("archive_take", "flag").await.unwrap());
    }
}
