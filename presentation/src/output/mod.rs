//! Output formatting for coordination results

pub mod console;
pub mod formatter;
