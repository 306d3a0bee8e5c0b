use ai_editorial::models::{load_problem_list, ProblemRef};
use ai_editorial::services::prompts::is_known_language;
use ai_editorial::utils::logging;
use ai_editorial::{App, Config};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ai-editorial")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "为 omegaUp 题目生成通过评测的代码和题解", long_about = None)]
struct Cli {
    /// 显示详细日志（等同 VERBOSE_LOGGING=true）
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 处理一道或多道题，全部 AC 时退出码为 0
    Run {
        /// 题目别名，最后一个参数若是语言标识则作为语言
        ids: Vec<String>,

        /// 从列表文件读取题目（每行一个，# 开头和空行忽略）
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// 提交语言，例如 cpp17-gcc、py3
        #[arg(short, long)]
        language: Option<String>,
    },
    /// 批量处理列表文件中的题目并输出报告，提前终止时退出码非 0
    Batch {
        /// 题目列表文件
        #[arg(short, long)]
        file: PathBuf,

        /// 提交语言
        language: Option<String>,
    },
    /// 发现带质量标记的题目并随机抽样
    Discover {
        /// 抽取数量
        #[arg(default_value = "50")]
        count: usize,

        /// 输出的列表文件
        #[arg(short, long, default_value = "quality_problems.txt")]
        output: PathBuf,

        /// 随机种子，便于复现
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load()?;
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command {
        Commands::Run { ids, file, language } => {
            let (mut aliases, trailing_language) = split_trailing_language(ids);
            if let Some(path) = file {
                aliases.extend(load_problem_list(&path).await?);
            }
            if aliases.is_empty() {
                bail!("没有指定任何题目，请提供题目别名或 --file");
            }

            let language = language.or(trailing_language);
            let problems: Vec<ProblemRef> = aliases
                .into_iter()
                .map(|alias| match &language {
                    Some(lang) => ProblemRef::with_language(alias, lang),
                    None => ProblemRef::new(alias),
                })
                .collect();

            let app = App::initialize(config).await?;
            let stats = app.run_problems(&problems).await?;

            if !stats.all_accepted() {
                info!("存在未通过的题目，退出码 1");
                std::process::exit(1);
            }
        }

        Commands::Batch { file, language } => {
            let app = App::initialize(config).await?;
            app.run_batch(&file, language.as_deref()).await?;
        }

        Commands::Discover {
            count,
            output,
            seed,
        } => {
            let app = App::initialize(config).await?;
            let aliases = app.discover(count, &output, seed).await?;
            println!("已保存 {} 道题到 {}", aliases.len(), output.display());
        }
    }

    Ok(())
}

/// 最后一个参数是已知语言标识时，把它拆出来作为语言
fn split_trailing_language(mut ids: Vec<String>) -> (Vec<String>, Option<String>) {
    if ids.len() > 1 && ids.last().is_some_and(|tag| is_known_language(tag)) {
        let language = ids.pop();
        (ids, language)
    } else {
        (ids, None)
    }
}
