#![deny(warnings)]

//! Translation orchestration: an ordered chain of HTTP providers under one
//! overall deadline, degrading to a deterministic mock translation.

pub mod config;
pub mod deadline;
pub mod http;
pub mod translate;
