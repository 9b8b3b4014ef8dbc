pub mod job;
pub mod segment;
pub mod summary;
pub mod transcript;

pub use job::*;
pub use segment::*;
pub use summary::*;
pub use transcript::*;
