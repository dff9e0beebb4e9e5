pub mod canonical;
pub mod platform;
pub mod score;
