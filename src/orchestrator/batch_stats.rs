//! 批量处理统计
//!
//! 由批量执行器逐题更新并最终返回，不存在全局共享状态

use crate::models::{OutcomeCategory, PipelineOutcome, Verdict};
use std::fmt::Write;
use tracing::{info, warn};

/// 批量处理统计
///
/// `accepted_first + accepted_second + no_accept + system_errors == total`
#[derive(Debug, Clone, Default)]
pub struct BatchStatistics {
    /// 计划处理的题目数
    pub planned: usize,
    /// 实际处理完成的题目数
    pub total: usize,
    pub accepted_any: usize,
    pub accepted_first: usize,
    pub accepted_second: usize,
    pub no_accept: usize,
    pub system_errors: usize,
    /// 未通过的题目中以部分通过收尾的数量（仅供参考，不参与划分）
    pub partial_no_accept: usize,
    /// 按处理顺序排列的结果
    pub outcomes: Vec<PipelineOutcome>,
    /// 提前终止的原因
    pub aborted: Option<String>,
}

impl BatchStatistics {
    pub fn new(planned: usize) -> Self {
        Self {
            planned,
            ..Default::default()
        }
    }

    /// 记录一道题的结果，恰好增加一个分类计数
    pub fn record(&mut self, outcome: PipelineOutcome) {
        self.total += 1;
        match outcome.category() {
            OutcomeCategory::AcceptedFirstTry => {
                self.accepted_first += 1;
                self.accepted_any += 1;
            }
            OutcomeCategory::AcceptedSecondTry => {
                self.accepted_second += 1;
                self.accepted_any += 1;
            }
            OutcomeCategory::NoAccept => {
                self.no_accept += 1;
                if outcome.final_verdict == Some(Verdict::PartiallyAccepted) {
                    self.partial_no_accept += 1;
                }
            }
            OutcomeCategory::SystemError => self.system_errors += 1,
        }
        self.outcomes.push(outcome);
    }

    /// 因凭证失效等原因提前终止
    pub fn abort(&mut self, reason: impl Into<String>) {
        self.aborted = Some(reason.into());
    }

    /// 未执行的题目数
    pub fn not_run(&self) -> usize {
        self.planned.saturating_sub(self.total)
    }

    /// 已处理的题目是否全部 AC
    pub fn all_accepted(&self) -> bool {
        self.accepted_any == self.total && self.aborted.is_none()
    }

    pub fn editorials_uploaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.editorial_uploaded).count()
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }

    /// 首次失败后重试成功的比例
    fn retry_effectiveness(&self) -> f64 {
        let retried = self.total - self.accepted_first;
        let retried = retried.saturating_sub(self.system_errors_before_retry());
        if retried == 0 {
            0.0
        } else {
            self.accepted_second as f64 * 100.0 / retried as f64
        }
    }

    /// 没有走到第二次尝试的系统错误
    fn system_errors_before_retry(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.category() == OutcomeCategory::SystemError && o.attempt_count < 2)
            .count()
    }

    /// 生成文本报告
    pub fn render_report(&self) -> String {
        let mut report = String::new();
        let line = "=".repeat(60);

        let _ = writeln!(report, "{}", line);
        let _ = writeln!(report, "题解流水线批量报告");
        let _ = writeln!(
            report,
            "生成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(report, "{}", line);
        let _ = writeln!(report, "计划题目: {}", self.planned);
        let _ = writeln!(report, "已处理: {}", self.total);
        let _ = writeln!(
            report,
            "AC 总数: {} ({:.1}%)",
            self.accepted_any,
            self.percent(self.accepted_any)
        );
        let _ = writeln!(
            report,
            "  首次 AC: {} ({:.1}%)",
            self.accepted_first,
            self.percent(self.accepted_first)
        );
        let _ = writeln!(
            report,
            "  重试后 AC: {} ({:.1}%)",
            self.accepted_second,
            self.percent(self.accepted_second)
        );
        let _ = writeln!(
            report,
            "未通过: {} ({:.1}%)，其中部分通过 {}",
            self.no_accept,
            self.percent(self.no_accept),
            self.partial_no_accept
        );
        let _ = writeln!(
            report,
            "系统/API 错误: {} ({:.1}%)",
            self.system_errors,
            self.percent(self.system_errors)
        );
        let _ = writeln!(report, "重试成功率: {:.1}%", self.retry_effectiveness());
        let _ = writeln!(report, "题解上传成功: {}", self.editorials_uploaded());

        if let Some(reason) = &self.aborted {
            let _ = writeln!(report, "⚠️ 批量任务提前终止: {}", reason);
            let _ = writeln!(report, "未执行的题目: {}", self.not_run());
        }

        let _ = writeln!(report, "{}", "─".repeat(60));
        for outcome in &self.outcomes {
            let _ = writeln!(report, "{}", outcome.summary_line());
        }
        let _ = writeln!(report, "{}", line);

        report
    }

    /// 打印最终统计
    pub fn log_summary(&self, report_path: &str) {
        info!("\n{}", "=".repeat(60));
        info!("📊 全部处理完成统计");
        info!(
            "完成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        info!("{}", "=".repeat(60));
        info!(
            "✅ AC: {}/{} ({:.1}%)",
            self.accepted_any,
            self.total,
            self.percent(self.accepted_any)
        );
        info!("   首次 AC: {}", self.accepted_first);
        info!("   重试后 AC: {}", self.accepted_second);
        info!(
            "❌ 未通过: {} (部分通过 {})",
            self.no_accept, self.partial_no_accept
        );
        info!("⚠️ 系统错误: {}", self.system_errors);
        info!("📝 题解上传: {}", self.editorials_uploaded());
        if let Some(reason) = &self.aborted {
            warn!("🛑 提前终止: {} (未执行 {} 题)", reason, self.not_run());
        }
        info!("{}", "=".repeat(60));
        info!("\n报告已保存至: {}", report_path);
    }
}
