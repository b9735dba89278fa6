#![forbid(unsafe_code)]

pub mod banking;
pub mod cli;
pub mod config;
pub mod io;
