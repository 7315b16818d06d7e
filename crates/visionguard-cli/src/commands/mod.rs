pub mod control;
pub mod daemon;
pub mod settings;
pub mod stats;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
