// inkredact/src/commands/mod.rs
pub mod process;
pub mod rules;
