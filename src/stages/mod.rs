pub mod diarize;
pub mod metrics;
pub mod paragraphs;
pub mod pipeline;

pub use diarize::*;
pub use metrics::*;
pub use paragraphs::*;
pub use pipeline::*;
