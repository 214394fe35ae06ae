//! Core engine: status store, bot log, trading worker and the
//! controller that owns the worker's lifecycle.

pub mod status;
pub mod logger;
pub mod worker;
pub mod controller;
