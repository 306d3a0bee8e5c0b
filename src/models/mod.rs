pub mod loaders;
pub mod outcome;
pub mod problem;
pub mod verdict;

pub use loaders::{load_problem_list, parse_problem_list, save_problem_list};
pub use outcome::{Attempt, OutcomeCategory, PipelineOutcome};
pub use problem::{ProblemRef, ProblemStatement, SamplePair};
pub use verdict::Verdict;
