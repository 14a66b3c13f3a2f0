//! Core terminal interfaces and input decoding.

pub mod input;
pub mod output;
pub mod terminal;
