pub mod extract;
pub mod handlers;
pub mod matching;
pub mod parser;
pub mod prompts;
pub mod skills;
