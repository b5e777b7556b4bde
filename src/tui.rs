//! Terminal view binding
//!
//! Pure projection of store snapshots plus the two pieces of UI-owned
//! state the core treats as external: the router (current conversation id)
//! and the composer.

mod app;
mod view;

pub use app::run;
