//! Progress reporting for coordination rounds

pub mod reporter;
