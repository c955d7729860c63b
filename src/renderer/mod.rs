//! Rendering
//!
//! The scene builder turns game state into a [`Frame`] of flat-shaded
//! triangles and textured quads; [`RenderState`] replays it on WebGPU.

pub mod backdrop;
pub mod canvas;
pub mod color;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use canvas::{Blend, Frame, Overlays};
pub use pipeline::RenderState;
pub use scene::{SceneRenderer, SceneView};
