//! User-facing console output

pub mod human;

pub use human::HumanFormatter;
