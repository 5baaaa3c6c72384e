//! Outer adapters: CSV input and output, and the replay of scripted actions
//! against the engine.

pub mod csv;
pub mod replay;
