//! CLI command implementations.

pub mod drive;
pub mod map;
pub mod publish;
pub mod run;
