//! Natural-language query interpretation for desk matching.
//!
//! Two interpreters implement the core [`QueryInterpreter`] seam: an
//! LLM-backed parser for deployments with an API key, and a deterministic
//! keyword interpreter for offline use and tests.

pub mod keyword;
pub mod llm;
pub mod openai;
pub mod parser;

pub use keyword::KeywordInterpreter;
pub use llm::LlmClient;
pub use openai::OpenAiClient;
pub use parser::LlmQueryParser;
