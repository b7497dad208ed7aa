//! DxfView Render Library
//!
//! Renderer abstraction for DxfView. Frames are described in screen space
//! through the [`Renderer`] trait; [`DisplayList`] records them.

mod display_list;
mod renderer;

pub use display_list::{DisplayList, DrawCommand};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, build_frame};
