pub mod error;
pub mod models;
pub mod normalize;
pub mod scoreboard;
pub mod source;
