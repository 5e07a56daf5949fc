pub mod daily;
pub mod duration;
pub mod stats;
