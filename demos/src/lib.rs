//! Shared helpers for the runnable examples under `demos/examples/`.

pub mod common;
