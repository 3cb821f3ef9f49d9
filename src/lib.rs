//! A small OpenGL still-life renderer: a handful of procedurally generated primitives lit by two
//! Phong lights, textured, and viewed through a free-fly camera.

pub mod abs;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod logger;
pub mod other;
pub mod render;
