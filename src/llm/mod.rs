pub mod chunking;
pub mod client;
pub mod prompts;
pub mod summarize;
pub mod tokens;

pub use chunking::*;
pub use client::*;
pub use prompts::*;
pub use summarize::*;
pub use tokens::*;
