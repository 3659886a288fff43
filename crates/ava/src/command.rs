use anyhow::{Context, Result};
use ava_migration::schema::Migration;
use ava_entity::entities::prelude::*;
use ava_migration::{Migrator, MigratorTrait, REGISTRY};
use sea_orm::{EntityTrait, PaginatorTrait};
use tracing::info;

use crate::config::{strictness, Args, Command};
use crate::database;

pub async fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Plan { json } => {
            println!("{}", render_plan(*json)?);
            Ok(())
        }
        Command::Check { strict } => {
            let ordered = ava_migration::check(REGISTRY, strictness(*strict))?;
            info!("迁移记录校验通过，共 {} 条", ordered.len());
            Ok(())
        }
        Command::Migrate { strict } => {
            let url = database_url(args)?;
            let connection = database::setup_database(&url, strictness(*strict)).await?;
            info!("数据库已是最新结构: {}", url);
            connection.close().await?;
            Ok(())
        }
        Command::Rollback { steps } => {
            let url = database_url(args)?;
            let connection = database::open_database(&url).await?;
            Migrator::down(&connection, Some(*steps))
                .await
                .with_context(|| format!("回滚 {} 条迁移失败", steps))?;
            info!("已回滚 {} 条迁移", steps);
            connection.close().await?;
            Ok(())
        }
        Command::Status => {
            let url = database_url(args)?;
            let connection = database::open_database(&url).await?;
            let applied = Migrator::get_applied_migrations(&connection).await?;
            let pending = Migrator::get_pending_migrations(&connection).await?;
            for migration in &applied {
                println!("[已应用] {}", migration.name());
            }
            for migration in &pending {
                println!("[未应用] {}", migration.name());
            }
            info!("已应用 {} 条，未应用 {} 条", applied.len(), pending.len());
            if pending.is_empty() {
                // 结构完整时顺带统计各表记录数
                let nodes = FarmNode::find().count(&connection).await?;
                let jobs = FarmJob::find().count(&connection).await?;
                let takes = Take::find().count(&connection).await?;
                println!("节点 {}，作业 {}，素材 {}", nodes, jobs, takes);
            }
            connection.close().await?;
            Ok(())
        }
    }
}

fn database_url(args: &Args) -> Result<String> {
    match &args.database_url {
        Some(url) => Ok(url.clone()),
        None => database::default_database_url(),
    }
}

/// 按执行顺序输出迁移记录
pub fn render_plan(json: bool) -> Result<String> {
    let ordered = ava_migration::schema::graph::plan(REGISTRY)?;
    if json {
        return Ok(serde_json::to_string_pretty(&ordered)?);
    }
    Ok(ordered
        .iter()
        .enumerate()
        .map(|(i, record)| render_record(i + 1, record))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn render_record(index: usize, record: &Migration) -> String {
    let mut lines = vec![format!("[{}] {}", index, record.label())];
    if !record.dependencies.is_empty() {
        let deps: Vec<String> = record.dependencies.iter().map(|d| d.to_string()).collect();
        lines.push(format!("    依赖: {}", deps.join(", ")));
    }
    for operation in record.operations {
        lines.push(format!("    - {}", operation.describe()));
    }
    lines.join("\n")
}
