// Data models
pub mod player;
pub mod stats;
