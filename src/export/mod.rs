pub mod minutes;
pub mod subtitles;

pub use minutes::*;
pub use subtitles::*;
