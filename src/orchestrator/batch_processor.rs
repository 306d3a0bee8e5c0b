//! 批量题目处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量题目的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、登录评测平台
//! 2. **顺序处理**：逐题调用 `ProblemFlow`，题与题之间按配置间隔等待
//! 3. **失败隔离**：单题失败只记录为结果，不影响后续题目
//! 4. **凭证检查**：第一道题即认证失败时提前终止整个批次
//! 5. **全局统计**：汇总为 `BatchStatistics` 并输出报告

use crate::clients::{LlmClient, OmegaUpClient};
use crate::config::Config;
use crate::error::FileError;
use crate::models::{load_problem_list, save_problem_list, ProblemRef};
use crate::orchestrator::batch_stats::BatchStatistics;
use crate::orchestrator::discovery::Discovery;
use crate::services::{CodeGenService, EditorialService};
use crate::utils::logging;
use crate::workflow::{FlowSettings, ProblemCtx, ProblemFlow};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 顺序批量执行器
pub struct BatchRunner {
    flow: ProblemFlow,
    default_language: String,
    /// 两道题之间的最小间隔
    delay: Duration,
    /// 每题摘要追加到的日志文件
    log_file: Option<String>,
}

impl BatchRunner {
    pub fn new(flow: ProblemFlow, default_language: impl Into<String>, delay: Duration) -> Self {
        Self {
            flow,
            default_language: default_language.into(),
            delay,
            log_file: None,
        }
    }

    pub fn with_log_file(mut self, path: impl Into<String>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// 按顺序处理所有题目，返回统计结果
    pub async fn run(&self, problems: &[ProblemRef]) -> BatchStatistics {
        let total = problems.len();
        let mut stats = BatchStatistics::new(total);

        for (i, problem) in problems.iter().enumerate() {
            let index = i + 1;

            if i > 0 && !self.delay.is_zero() {
                info!("⏳ 等待 {} 秒后处理下一题...", self.delay.as_secs_f64());
                tokio::time::sleep(self.delay).await;
            }

            logging::log_item_start(index, total, &problem.to_string());
            let ctx = ProblemCtx::new(
                &problem.alias,
                problem.language_or(&self.default_language),
                index,
                total,
            );

            let outcome = self.flow.run(&ctx).await;
            let summary = outcome.summary_line();
            logging::log_item_complete(index, total, &summary);
            self.append_summary(&summary);

            let dead_credential = index == 1 && outcome.auth_failure;
            stats.record(outcome);

            if dead_credential && total > 1 {
                error!("🛑 第一道题即认证失败，凭证无效，终止批量任务");
                stats.abort("第一道题认证失败，凭证无效");
                break;
            }
        }

        stats
    }

    fn append_summary(&self, summary: &str) {
        if let Some(path) = &self.log_file {
            if let Err(e) = logging::append_log_line(path, summary) {
                warn!("⚠️ 写入日志文件失败: {}", e);
            }
        }
    }
}

/// 提前终止的批次在报告写出之后仍按失败返回
fn ensure_completed(stats: BatchStatistics) -> Result<BatchStatistics> {
    if let Some(reason) = &stats.aborted {
        bail!(
            "批量任务提前终止 ({}/{} 题已处理): {}",
            stats.total,
            stats.planned,
            reason
        );
    }
    Ok(stats)
}

/// 应用主结构
pub struct App {
    config: Config,
    judge: Arc<OmegaUpClient>,
}

impl App {
    /// 初始化应用：校验配置并登录评测平台
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        let judge = OmegaUpClient::new(&config).context("创建评测平台客户端失败")?;
        judge.login().await.context("登录评测平台失败")?;

        Ok(Self {
            config,
            judge: Arc::new(judge),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 组装单题流程和批量执行器
    fn build_runner(&self) -> Result<BatchRunner> {
        self.config.validate_llm()?;

        let llm = Arc::new(LlmClient::new(&self.config));
        info!("🤖 LLM 模型: {}", llm.model_name());

        let flow = ProblemFlow::new(
            self.judge.clone(),
            Arc::new(CodeGenService::new(llm.clone())),
            Arc::new(EditorialService::new(llm)),
            FlowSettings::from_config(&self.config),
        );

        Ok(BatchRunner::new(
            flow,
            self.config.default_language.clone(),
            self.config.batch_delay(),
        )
        .with_log_file(self.config.output_log_file.clone()))
    }

    /// 处理命令行指定的题目
    pub async fn run_problems(&self, problems: &[ProblemRef]) -> Result<BatchStatistics> {
        logging::init_log_file(&self.config.output_log_file, "题解流水线日志")?;
        logging::log_startup("单题模式", &self.config.default_language);
        logging::log_problems_loaded(problems.len(), self.config.batch_delay_secs);

        let runner = self.build_runner()?;
        let stats = runner.run(problems).await;
        stats.log_summary(&self.config.output_log_file);

        Ok(stats)
    }

    /// 批量处理列表文件中的题目，输出报告
    pub async fn run_batch(&self, list_path: &Path, language: Option<&str>) -> Result<BatchStatistics> {
        info!("\n📁 正在读取题目列表: {}", list_path.display());
        let aliases = load_problem_list(list_path).await?;

        if aliases.is_empty() {
            warn!("⚠️ 题目列表为空，程序结束");
        }

        let problems: Vec<ProblemRef> = aliases
            .into_iter()
            .map(|alias| match language {
                Some(lang) => ProblemRef::with_language(alias, lang),
                None => ProblemRef::new(alias),
            })
            .collect();

        logging::init_log_file(&self.config.output_log_file, "题解流水线批量日志")?;
        logging::log_startup(
            "批量模式",
            language.unwrap_or(&self.config.default_language),
        );
        logging::log_problems_loaded(problems.len(), self.config.batch_delay_secs);

        let runner = self.build_runner()?;
        let stats = runner.run(&problems).await;

        let report = stats.render_report();
        tokio::fs::write(&self.config.report_file, &report)
            .await
            .map_err(|e| FileError::write_failed(&self.config.report_file, e))?;

        println!("{}", report);
        stats.log_summary(&self.config.report_file);

        ensure_completed(stats)
    }

    /// 发现题目并写入列表文件
    pub async fn discover(&self, count: usize, output: &Path, seed: Option<u64>) -> Result<Vec<String>> {
        let discovery = Discovery::new(
            self.judge.clone(),
            self.config.discovery_page_size,
            self.config.discovery_max_pages,
        );
        let aliases = discovery.discover(count, seed).await?;

        let mut header = vec![
            format!(
                "带质量标记的题目 - 生成于 {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            ),
            format!("数量: {} (请求 {})", aliases.len(), count),
        ];
        if let Some(seed) = seed {
            header.push(format!("随机种子: {}", seed));
        }

        save_problem_list(output, &header, &aliases).await?;
        info!("✓ 题目列表已保存至: {}", output.display());

        Ok(aliases)
    }
}
