//! This module contains the thin GPU layer the renderer is built on:
//! window and context setup, shader management, meshes and textures.

pub mod app;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
