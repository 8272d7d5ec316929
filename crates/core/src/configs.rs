//! Configuration file parsing

pub mod run;
