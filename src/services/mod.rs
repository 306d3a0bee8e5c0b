pub mod code_generator;
pub mod editorial_generator;
pub mod prompts;

pub use code_generator::{CodeGenService, SolutionGenerator};
pub use editorial_generator::{EditorialGenerator, EditorialService};
