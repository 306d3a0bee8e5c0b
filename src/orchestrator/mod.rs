//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量执行器与应用入口
//! - 管理应用生命周期（校验配置、登录、组装流程）
//! - 逐题顺序调用 `ProblemFlow`，题间限速
//! - 单题失败隔离，第一题凭证失效时提前终止
//!
//! ### `batch_stats` - 批量统计
//! - 每题结果恰好计入一个分类
//! - 生成报告文件和最终统计日志
//!
//! ### `discovery` - 题目发现
//! - 分页拉取带质量标记的题目（惰性 `Stream`）
//! - 去重、随机抽样，输出列表文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ProblemRef>)
//!     ↓
//! workflow::ProblemFlow (处理单道题)
//!     ↓
//! services (能力层：代码生成 / 题解生成)
//!     ↓
//! clients (评测平台 / LLM)
//! ```

pub mod batch_processor;
pub mod batch_stats;
pub mod discovery;

// 重新导出主要类型
pub use batch_processor::{App, BatchRunner};
pub use batch_stats::BatchStatistics;
pub use discovery::Discovery;
