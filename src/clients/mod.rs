pub mod judge_client;
pub mod llm_client;
pub mod statement_parser;

pub use judge_client::{
    JudgeApi, ListingPage, OmegaUpClient, PageToken, PollStatus, SubmissionHandle,
};
pub use llm_client::{CompletionClient, LlmClient};
