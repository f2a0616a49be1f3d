//! Live polling of a registered source.
//!
//! - `engine`: the [`PollingEngine`], owner of the single polling session.
//! - `state`: session bookkeeping guarded by the engine lock.
//! - `history`: the bounded most-recent-first reading window.

mod engine;
mod history;
mod state;

pub use engine::PollingEngine;
