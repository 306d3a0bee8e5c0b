//! # AI Editorial
//!
//! 为评测平台（omegaUp）上的题目自动生成、验证代码并撰写题解的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 远程能力，只负责请求和响应解析
//! - `OmegaUpClient` - 拉题、提交、查询结果、上传题解、题目列表（`JudgeApi`）
//! - `LlmClient` - OpenAI 兼容的文本补全（`CompletionClient`）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `CodeGenService` - 根据题面（和上一次的评测反馈）生成代码
//! - `EditorialService` - 根据通过的代码生成题解
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `ProblemCtx` - 上下文封装（alias + 语言 + 序号）
//! - `ProblemFlow` - 状态机（拉题 → 生成 → 提交 → 轮询 → 重试 → 题解 → 上传）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 顺序批量执行，限速、失败隔离
//! - `orchestrator/batch_stats` - 批量统计与报告
//! - `orchestrator/discovery` - 分页发现题目并抽样
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CompletionClient, JudgeApi, LlmClient, OmegaUpClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Attempt, OutcomeCategory, PipelineOutcome, ProblemRef, ProblemStatement, Verdict};
pub use orchestrator::{App, BatchRunner, BatchStatistics, Discovery};
pub use services::{EditorialGenerator, SolutionGenerator};
pub use workflow::{FlowSettings, ProblemCtx, ProblemFlow};
