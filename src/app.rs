//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and owns the playback controller,
//! the search coordinator and the list/search UI state.

mod model;

pub use model::*;
