//! `lakemont_core` — platform-independent support types for the Lakemont demo.
//!
//! | Module    | Responsibility                                    |
//! |-----------|---------------------------------------------------|
//! | `context` | wgpu instance/adapter/device/queue initialisation |
//! | `time`    | Frame clock and per-frame `Time` snapshots        |
//! | `input`   | Keyboard / mouse state fed by the event loop      |
//! | `camera`  | First-person walk camera                          |

pub mod camera;
pub mod context;
pub mod input;
pub mod time;

pub use camera::Camera;
pub use context::EngineContext;
pub use input::InputState;
pub use time::{Time, TimeClock};
