pub mod generate;
pub mod program;
pub mod setup;
