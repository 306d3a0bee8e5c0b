//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序（无环状态机）：
//! 1. 拉取题面
//! 2. 生成代码 → 提交 → 轮询结果
//! 3. 未 AC 时带着评测反馈重试一次
//! 4. AC 后生成题解并上传
//!
//! 所有错误都收敛为 `PipelineOutcome`，流程本身从不返回错误

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::clients::{JudgeApi, PollStatus, SubmissionHandle};
use crate::config::Config;
use crate::error::PipelineError;
use crate::models::{Attempt, PipelineOutcome, ProblemStatement, Verdict};
use crate::services::{EditorialGenerator, SolutionGenerator};
use crate::utils::logging::truncate_text;
use crate::workflow::problem_ctx::ProblemCtx;

/// 最多尝试次数（首次 + 一次重试）
const MAX_ATTEMPTS: u8 = 2;

/// 流程节奏参数
#[derive(Debug, Clone, Copy)]
pub struct FlowSettings {
    /// 两次轮询之间的间隔
    pub poll_interval: Duration,
    /// 最多轮询次数，超过视为系统错误
    pub max_poll_attempts: u32,
    /// 第二次提交前的等待（平台对同一题的提交频率限制）
    pub retry_submit_delay: Duration,
}

impl FlowSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            max_poll_attempts: config.max_poll_attempts,
            retry_submit_delay: config.retry_submit_delay(),
        }
    }
}

/// 失败原因
#[derive(Debug)]
enum FailReason {
    /// 两次都没有 AC
    NoAccept,
    /// 系统/API 错误
    System(PipelineError),
}

/// 流程状态
#[derive(Debug)]
enum FlowState {
    Fetching,
    Generating { ordinal: u8 },
    Submitting { ordinal: u8, source: String },
    Polling { ordinal: u8, source: String, handle: SubmissionHandle },
    Evaluated(Attempt),
    Editorializing,
    Uploading { editorial: String },
    Done,
    Failed(FailReason),
}

/// 一次流程运行中逐步积累的数据
struct FlowRun {
    statement: ProblemStatement,
    attempt_count: u8,
    attempts: Vec<Attempt>,
    source: Option<String>,
    editorial: Option<String>,
    editorial_uploaded: bool,
}

impl FlowRun {
    fn new() -> Self {
        Self {
            statement: ProblemStatement::default(),
            attempt_count: 0,
            attempts: Vec::new(),
            source: None,
            editorial: None,
            editorial_uploaded: false,
        }
    }

    fn finish(self, ctx: &ProblemCtx, failure: Option<PipelineError>) -> PipelineOutcome {
        let final_verdict = self.attempts.last().map(|a| a.verdict);
        let accepted = failure.is_none() && final_verdict.is_some_and(Verdict::is_accepted);

        PipelineOutcome {
            alias: ctx.alias.clone(),
            language: ctx.language.clone(),
            final_verdict,
            accepted,
            attempt_count: self.attempt_count,
            attempts: self.attempts,
            source: self.source,
            editorial: self.editorial,
            editorial_uploaded: self.editorial_uploaded,
            auth_failure: failure.as_ref().is_some_and(PipelineError::is_auth_failure),
            error: failure.map(|e| e.to_string()),
        }
    }
}

/// 题目处理流程
///
/// - 编排完整的单题处理流程
/// - 决定何时生成、何时重试、何时写题解
/// - 只依赖能力接口（clients / services）
pub struct ProblemFlow {
    judge: Arc<dyn JudgeApi>,
    solver: Arc<dyn SolutionGenerator>,
    editorial: Arc<dyn EditorialGenerator>,
    settings: FlowSettings,
}

impl ProblemFlow {
    pub fn new(
        judge: Arc<dyn JudgeApi>,
        solver: Arc<dyn SolutionGenerator>,
        editorial: Arc<dyn EditorialGenerator>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            judge,
            solver,
            editorial,
            settings,
        }
    }

    /// 处理一道题，恰好返回一个结果
    pub async fn run(&self, ctx: &ProblemCtx) -> PipelineOutcome {
        info!("{} 🚀 开始处理，语言: {}", ctx, ctx.language);

        let mut run = FlowRun::new();
        let mut state = FlowState::Fetching;

        loop {
            state = match state {
                FlowState::Done => {
                    let outcome = run.finish(ctx, None);
                    info!("{} ✅ 流程结束: {}", ctx, outcome.category());
                    return outcome;
                }
                FlowState::Failed(FailReason::NoAccept) => {
                    let outcome = run.finish(ctx, None);
                    warn!("{} ❌ 两次尝试均未通过: {}", ctx, outcome.category());
                    return outcome;
                }
                FlowState::Failed(FailReason::System(err)) => {
                    error!("{} ❌ 系统错误: {}", ctx, err);
                    return run.finish(ctx, Some(err));
                }
                other => self.step(other, &mut run, ctx).await,
            };
        }
    }

    /// 执行一个状态，返回下一个状态
    async fn step(&self, state: FlowState, run: &mut FlowRun, ctx: &ProblemCtx) -> FlowState {
        match state {
            FlowState::Fetching => {
                info!("{} 📥 正在拉取题面...", ctx);
                match self.judge.fetch_problem(&ctx.alias).await {
                    Ok(statement) => {
                        info!(
                            "{} ✓ 题面: {} ({} 组样例)",
                            ctx,
                            statement.title,
                            statement.samples.len()
                        );
                        debug!("{} 题面预览: {}", ctx, truncate_text(&statement.statement, 200));
                        run.statement = statement;
                        FlowState::Generating { ordinal: 1 }
                    }
                    Err(e) => FlowState::Failed(FailReason::System(PipelineError::Fetch(e))),
                }
            }

            FlowState::Generating { ordinal } => {
                run.attempt_count = ordinal;
                let prior = if ordinal > 1 { run.attempts.last() } else { None };
                let generated = self
                    .solver
                    .generate_code(&run.statement, &ctx.language, prior)
                    .await;

                match generated {
                    Ok(source) => {
                        run.source = Some(source.clone());
                        FlowState::Submitting { ordinal, source }
                    }
                    Err(e) => FlowState::Failed(FailReason::System(PipelineError::Generation(e))),
                }
            }

            FlowState::Submitting { ordinal, source } => {
                if ordinal > 1 && !self.settings.retry_submit_delay.is_zero() {
                    info!(
                        "{} ⏳ 等待 {} 秒后再次提交（平台提交频率限制）",
                        ctx,
                        self.settings.retry_submit_delay.as_secs()
                    );
                    tokio::time::sleep(self.settings.retry_submit_delay).await;
                }

                info!("{} 📤 正在提交第 {} 次代码...", ctx, ordinal);
                let submitted = self
                    .judge
                    .submit_solution(&ctx.alias, &ctx.language, &source)
                    .await;

                match submitted {
                    Ok(handle) => {
                        info!("{} ✓ 提交成功，run: {} ({})", ctx, handle.guid, handle.language);
                        FlowState::Polling {
                            ordinal,
                            source,
                            handle,
                        }
                    }
                    Err(e) => FlowState::Failed(FailReason::System(PipelineError::Submit(e))),
                }
            }

            FlowState::Polling {
                ordinal,
                source,
                handle,
            } => match self.poll_until_done(&handle, ctx).await {
                Ok((verdict, feedback, score)) => FlowState::Evaluated(Attempt {
                    ordinal,
                    source,
                    verdict,
                    feedback,
                    score,
                }),
                Err(e) => FlowState::Failed(FailReason::System(e)),
            },

            FlowState::Evaluated(attempt) => {
                let ordinal = attempt.ordinal;
                let verdict = attempt.verdict;
                info!(
                    "{} 📊 第 {} 次评测结果: {} (score: {})",
                    ctx, ordinal, verdict, attempt.score
                );
                if !attempt.feedback.is_empty() {
                    debug!("{} 评测反馈: {}", ctx, truncate_text(&attempt.feedback, 300));
                }
                run.attempts.push(attempt);

                if verdict.is_accepted() {
                    FlowState::Editorializing
                } else if ordinal < MAX_ATTEMPTS {
                    info!("{} 🔁 未通过，带着评测反馈重新生成", ctx);
                    FlowState::Generating {
                        ordinal: ordinal + 1,
                    }
                } else {
                    FlowState::Failed(FailReason::NoAccept)
                }
            }

            FlowState::Editorializing => {
                let Some(accepted) = run.attempts.last() else {
                    return FlowState::Done;
                };
                let generated = self
                    .editorial
                    .generate_editorial(&run.statement, accepted, &ctx.language)
                    .await;

                match generated {
                    Ok(editorial) => FlowState::Uploading { editorial },
                    Err(e) => {
                        warn!("{} ⚠️ 题解生成失败，跳过上传: {}", ctx, e);
                        FlowState::Done
                    }
                }
            }

            FlowState::Uploading { editorial } => {
                info!("{} 📤 正在上传题解...", ctx);
                match self.judge.upload_editorial(&ctx.alias, &editorial).await {
                    Ok(true) => {
                        info!("{} ✓ 题解上传成功", ctx);
                        run.editorial_uploaded = true;
                    }
                    Ok(false) => warn!("{} ⚠️ 平台未接受题解", ctx),
                    Err(e) => warn!("{} ⚠️ {}", ctx, PipelineError::Upload(e)),
                }
                run.editorial = Some(editorial);
                FlowState::Done
            }

            terminal @ (FlowState::Done | FlowState::Failed(_)) => terminal,
        }
    }

    /// 轮询直到评测结束，超过次数上限视为系统错误
    async fn poll_until_done(
        &self,
        handle: &SubmissionHandle,
        ctx: &ProblemCtx,
    ) -> Result<(Verdict, String, f64), PipelineError> {
        for poll in 1..=self.settings.max_poll_attempts {
            tokio::time::sleep(self.settings.poll_interval).await;

            match self.judge.poll_verdict(handle).await {
                Ok(PollStatus::Finished {
                    verdict,
                    feedback,
                    score,
                }) if verdict.is_terminal() => return Ok((verdict, feedback, score)),
                Ok(_) => {
                    debug!(
                        "{} ⏳ 评测中... ({}/{})",
                        ctx, poll, self.settings.max_poll_attempts
                    );
                }
                Err(e) if e.is_unauthorized() => return Err(PipelineError::Poll(e)),
                // 临时错误只消耗一次轮询机会
                Err(e) => {
                    warn!(
                        "{} ⚠️ 查询评测结果失败 ({}/{})，稍后重试: {}",
                        ctx, poll, self.settings.max_poll_attempts, e
                    );
                }
            }
        }

        Err(PipelineError::PollExhausted {
            attempts: self.settings.max_poll_attempts,
        })
    }
}
