// inkredact/src/utils/mod.rs
pub mod artifact_writer;
pub mod inputs;
