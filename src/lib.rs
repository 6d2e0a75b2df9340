pub mod config;
pub mod parser;
pub mod transcript;

pub use parser::extract::AnswerView;
pub use parser::{process_answer, AnswerInput};
