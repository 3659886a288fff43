mod command;
mod config;
mod database;
mod utils;

use clap::Parser;
use tracing::error;

use crate::config::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = utils::init_logger(&args.log_level) {
        eprintln!("初始化日志失败: {:#}", e);
    }

    if let Err(e) = command::run(&args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
