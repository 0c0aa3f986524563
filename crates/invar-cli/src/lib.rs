//! Library components of the `invar` command line tool.

pub mod daikon;
pub mod logging;
pub mod trace;
