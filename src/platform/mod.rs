//! Platform abstraction layer
//!
//! The simulation only talks to the outside world through these boundaries:
//! - Input: held keys and discrete triggers
//! - Display: HUD counters and screen visibility
//! - Render: one read-only snapshot per frame

pub mod input;
pub mod sinks;

pub use input::{InputState, Key, KeyResponse, Trigger};
pub use sinks::{DetachedDisplay, DetachedRender, DisplaySink, NullDisplay, RenderSink, Snapshot};
