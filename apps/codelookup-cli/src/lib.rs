//! Terminal front end for the code lookup engine.

pub mod render;
pub mod session;
