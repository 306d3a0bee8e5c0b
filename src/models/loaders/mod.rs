pub mod list_loader;

pub use list_loader::{load_problem_list, parse_problem_list, save_problem_list};
