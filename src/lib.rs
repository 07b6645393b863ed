pub mod embedding;
pub mod openai;
pub mod runner;
