//! Reusable widgets.

pub mod slider;
