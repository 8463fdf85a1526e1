//! Window presentation through wgpu.
//!
//! Frames are produced on the CPU by the pass pipeline; this module only
//! owns the device/surface wiring (`context`) and the textured full-screen
//! triangle that puts each frame on screen (`presenter`).

mod context;
mod presenter;

pub use presenter::WindowPresenter;
