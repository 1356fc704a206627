//! Optional hooks around the render lifecycle.
//!
//! Keep extensions observational and avoid coupling them into decision paths.

pub mod observers;

pub use observers::{LifecycleEvent, LifecycleObserver};
