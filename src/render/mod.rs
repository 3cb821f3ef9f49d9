//! Module for anything related to rendering.
//!
//! This module contains the procedural geometry, the fixed scene description and the Phong
//! shader used to draw it.

pub mod geometry;
pub mod scene;
