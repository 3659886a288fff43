use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use ava_migration::{Migrator, MigratorTrait, Strictness, StrictMigrator, REGISTRY};
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sea_orm::sqlx;
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use tracing::{debug, info};

use crate::config::CONFIG_DIR;

/// 默认数据库地址：配置目录下的 data.sqlite
pub fn default_database_url() -> Result<String> {
    // 确保配置目录存在
    if !CONFIG_DIR.exists() {
        std::fs::create_dir_all(&*CONFIG_DIR).context("创建配置目录失败")?;
    }
    Ok(format!("sqlite://{}", CONFIG_DIR.join("data.sqlite").display()))
}

fn is_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// 创建 SQLite 连接选项，外键约束必须开启，否则级联删除与置空不会生效
fn create_sqlite_options(url: &str) -> Result<SqliteConnectOptions> {
    let mut options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("无效的数据库地址: {}", url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(90))
        .pragma("cache_size", "-65536")
        .pragma("temp_store", "MEMORY");
    if !is_memory(url) {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }
    Ok(options)
}

async fn database_connection(url: &str, max_connections: u32) -> Result<DatabaseConnection> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(90))
        .idle_timeout(Duration::from_secs(600))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                // 用 DEBUG 级别验证外键约束是否生效
                let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys;").fetch_one(&mut *conn).await?;
                tracing::debug!("新数据库连接已创建，foreign_keys = {}", row.0);
                Ok(())
            })
        })
        .connect_with(create_sqlite_options(url)?)
        .await
        .context("连接数据库失败")?;

    debug!("SQLite 连接池已创建，最多 {} 个连接", max_connections);
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 在给定连接上执行全部未应用的迁移
pub async fn run_migrations(connection: &DatabaseConnection, strictness: Strictness) -> Result<()> {
    // 先做静态校验，避免迁移执行到一半才失败
    let ordered = ava_migration::check(REGISTRY, strictness)?;
    debug!("迁移记录校验通过，共 {} 条", ordered.len());

    let pending = Migrator::get_pending_migrations(connection).await?;
    if pending.is_empty() {
        debug!("没有需要应用的迁移");
        return Ok(());
    }
    info!("将应用 {} 条迁移（{}模式）", pending.len(), strictness);

    match strictness {
        Strictness::Lenient => Migrator::up(connection, None).await?,
        Strictness::Strict => StrictMigrator::up(connection, None).await?,
    }
    Ok(())
}

async fn migrate_database(url: &str, strictness: Strictness) -> Result<()> {
    // 为迁移创建单连接池（避免多连接导致的迁移顺序问题）
    let connection = database_connection(url, 1).await?;
    run_migrations(&connection, strictness).await?;

    // 显式关闭连接池，确保释放所有数据库锁
    connection.close().await?;
    debug!("迁移完成，已关闭迁移连接池");
    Ok(())
}

/// 进行数据库迁移并获取数据库连接，供外部使用
pub async fn setup_database(url: &str, strictness: Strictness) -> Result<DatabaseConnection> {
    if is_memory(url) {
        // 内存库的每个连接互相独立，迁移和后续访问必须共用同一个连接
        let connection = database_connection(url, 1).await?;
        run_migrations(&connection, strictness).await?;
        return Ok(connection);
    }

    migrate_database(url, strictness).await?;
    database_connection(url, 16).await
}

/// 只连接不迁移，用于查看状态与回滚
pub async fn open_database(url: &str) -> Result<DatabaseConnection> {
    database_connection(url, 1).await
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use ava_entity::entities::prelude::*;
    use ava_entity::entities::{farm_job, farm_node, take};
    use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};

    use super::*;

    async fn memory_db() -> DatabaseConnection {
        setup_database("sqlite::memory:", Strictness::Lenient).await.unwrap()
    }

    async fn new_node(db: &DatabaseConnection) -> farm_node::Model {
        farm_node::ActiveModel {
            ip_address: Set("10.0.0.21".to_string()),
            machine_name: Set("render-21".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn new_take(db: &DatabaseConnection) -> take::Model {
        take::ActiveModel {
            name: Set("take_0042".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn new_job(db: &DatabaseConnection, node_id: Option<i32>, ext_take_id: Option<i32>) -> farm_job::Model {
        farm_job::ActiveModel {
            job_class: Set("jobs.ExportTake".to_string()),
            node_id: Set(node_id),
            ext_take_id: Set(ext_take_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_defaults_after_migration() {
        let db = memory_db().await;
        let node = new_node(&db).await;
        assert_eq!(node.status, "offline");
        assert!(!node.req_restart);

        let take = new_take(&db).await;
        // flag 的默认值按声明写入，即使它不在可选值里
        assert_eq!(take.flag, take::FLAG_DEFAULT);
        assert_eq!(take.rating, 0);
        assert_eq!(take.frame_count, 0);

        let job = new_job(&db, None, None).await;
        assert_eq!(job.status, "ready");
        assert_eq!(job.exception, None);
    }

    #[tokio::test]
    async fn test_deleting_node_cascades_to_jobs() {
        let db = memory_db().await;
        let node = new_node(&db).await;
        let other = new_node(&db).await;
        let job = new_job(&db, Some(node.id), None).await;
        let kept = new_job(&db, Some(other.id), None).await;

        assert_eq!(node.find_related(FarmJob).all(&db).await.unwrap().len(), 1);

        FarmNode::delete_by_id(node.id).exec(&db).await.unwrap();

        assert_eq!(FarmJob::find_by_id(job.id).one(&db).await.unwrap(), None);
        assert_matches!(FarmJob::find_by_id(kept.id).one(&db).await.unwrap(), Some(j) if j.node_id == Some(other.id));
    }

    #[tokio::test]
    async fn test_deleting_take_nulls_ext_take() {
        let db = memory_db().await;
        let take = new_take(&db).await;
        let job = new_job(&db, None, Some(take.id)).await;

        let ext_jobs = take.find_related(FarmJob).all(&db).await.unwrap();
        assert_eq!(ext_jobs.len(), 1);
        assert_eq!(ext_jobs[0].id, job.id);

        Take::delete_by_id(take.id).exec(&db).await.unwrap();

        let job = FarmJob::find_by_id(job.id).one(&db).await.unwrap().unwrap();
        assert_eq!(job.ext_take_id, None);
        assert_eq!(job.job_class, "jobs.ExportTake");
    }

    #[tokio::test]
    async fn test_strict_setup_rejects_flag() {
        let err = setup_database("sqlite::memory:", Strictness::Strict).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("archive.0012_take_flag"), "{}", message);
    }

    #[tokio::test]
    async fn test_migrations_are_applied_once() {
        let db = memory_db().await;
        run_migrations(&db, Strictness::Lenient).await.unwrap();
        let applied = Migrator::get_applied_migrations(&db).await.unwrap();
        assert_eq!(applied.len(), REGISTRY.len());
    }
}
