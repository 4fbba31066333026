mod api;
mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::app::workflow::pipeline::RunOptions;
use crate::config::AppConfig;

/// 读取三选一问答，借助网页搜索结果猜测正确答案
#[derive(Debug, Parser)]
#[command(name = "quiz_guesser", version)]
struct Cli {
    /// 问答文件 (TOML)
    #[arg(short, long)]
    quiz: PathBuf,

    /// 本轮最多处理的题数
    #[arg(short = 'n', long, default_value_t = 12)]
    questions: usize,

    /// 指定本轮目录（默认按时间段生成）
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// 配置文件名（不含扩展名）
    #[arg(short, long, default_value = "application")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;
    let _guard = app::logger::init(&config.log_dir, "quiz_guesser");

    let options = RunOptions {
        quiz: cli.quiz,
        max_questions: cli.questions,
        folder: cli.folder,
    };

    if let Err(e) = app::workflow::pipeline::run(&config, &options).await {
        tracing::error!("本轮执行失败: {:?}", e);
        return Err(e);
    }
    info!("========== 本轮问答结束 ==========");

    Ok(())
}
