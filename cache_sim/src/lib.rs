//! direct-mapped cache model and hit/miss statistics over address traces.

pub mod cache;
pub mod config;
pub mod sim;
pub mod stat;
pub mod trace;
