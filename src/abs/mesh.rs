//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh data on the GPU side.
//! Vertices should implement the [`Vertex`] trait. A mesh carries its own list of
//! [`DrawRange`]s so the caller never has to know how many vertices or indices to
//! submit.

use std::sync::Arc;

use glow::HasContext;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

/// A single draw call issued against a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawRange {
    /// Non-indexed draw over `count` vertices starting at `first`.
    Arrays { mode: u32, first: i32, count: i32 },
    /// Indexed draw over the first `count` indices of the element buffer.
    Elements { mode: u32, count: i32 },
}

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    vertex_count: usize,
    index_count: usize,
    draws: Vec<DrawRange>,
}

impl Mesh {
    /// Creates a new mesh from the given vertex and index data.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        indices: &[u32],
        draws: Vec<DrawRange>,
    ) -> Result<Self, String> {
        unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = gl.create_buffer()?;
            let ebo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    std::mem::size_of_val(vertices),
                ),
                glow::STATIC_DRAW,
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    indices.as_ptr() as *const u8,
                    std::mem::size_of_val(indices),
                ),
                glow::STATIC_DRAW,
            );

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                vbo,
                ebo,
                vertex_count: vertices.len(),
                index_count: indices.len(),
                draws,
            })
        }
    }

    /// Draws the mesh by issuing every draw range in order.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            for draw in &self.draws {
                match *draw {
                    DrawRange::Arrays { mode, first, count } => {
                        self.gl.draw_arrays(mode, first, count);
                    }
                    DrawRange::Elements { mode, count } => {
                        self.gl.draw_elements(mode, count, glow::UNSIGNED_INT, 0);
                    }
                }
            }
            self.gl.bind_vertex_array(None);
        }
    }

    /// Returns the raw vertex array name. Never zero for a live mesh.
    pub fn vao_id(&self) -> u32 {
        self.vao.0.get()
    }

    /// Returns the amount of vertices uploaded to the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the amount of indices uploaded to the mesh.
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
