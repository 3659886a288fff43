use std::path::PathBuf;

use ava_migration::Strictness;
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;

/// 配置目录，默认数据库文件放在这里
pub static CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ava")
});

#[derive(Parser, Debug)]
#[command(name = "ava", version, about = "AVA 数据层：作业农场与素材归档的数据库迁移")]
pub struct Args {
    /// 数据库连接地址，缺省为配置目录下的 data.sqlite
    #[arg(long, env = "AVA_DATABASE_URL")]
    pub database_url: Option<String>,

    /// 日志级别
    #[arg(long, env = "AVA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 应用所有未执行的迁移
    Migrate {
        /// 严格校验状态字段的默认值
        #[arg(long, env = "AVA_STRICT")]
        strict: bool,
    },
    /// 回滚最近的若干条迁移
    Rollback {
        #[arg(short = 'n', long, default_value_t = 1)]
        steps: u32,
    },
    /// 查看每条迁移是否已应用
    Status,
    /// 输出迁移的执行顺序
    Plan {
        #[arg(long)]
        json: bool,
    },
    /// 不连接数据库，仅校验迁移记录
    Check {
        #[arg(long, env = "AVA_STRICT")]
        strict: bool,
    },
}

pub fn strictness(strict: bool) -> Strictness {
    if strict {
        Strictness::Strict
    } else {
        Strictness::Lenient
    }
}
