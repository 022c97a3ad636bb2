//! Shared UI crate for Sessionscope: the analysis core and the Dioxus views
//! the platform shells mount.

pub mod analysis;
pub mod core;
pub mod results;
pub mod views;
