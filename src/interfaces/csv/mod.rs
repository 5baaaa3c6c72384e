pub mod action_reader;
pub mod writer;
