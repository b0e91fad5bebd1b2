//! Operator CLI for the cachext Redis client.

pub mod cli;
pub mod output;
