//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use glow::HasContext;

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    ///
    /// On failure the driver's info log is returned.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                let stage = match shader_type {
                    glow::VERTEX_SHADER => "vertex",
                    glow::FRAGMENT_SHADER => "fragment",
                    _ => "unknown",
                };
                return Err(format!("{} shader compilation failed: {}", stage, log.trim_end()));
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for bool {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_i32(Some(&loc), *self as i32);
            }
        }
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_i32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for Vec2 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_2_f32(Some(&loc), self.x, self.y);
            }
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_3_f32(Some(&loc), self.x, self.y, self.z);
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &self.to_cols_array());
            }
        }
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, String> {
        unsafe {
            let program = gl.create_program()?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(format!("program linking failed: {}", log.trim_end()));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Compiles a vertex and a fragment stage and links them together.
    pub fn from_sources(
        gl: &Arc<glow::Context>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, String> {
        let vert = Shader::new(gl, glow::VERTEX_SHADER, vertex_source)?;
        let frag = Shader::new(gl, glow::FRAGMENT_SHADER, fragment_source)?;
        Self::new(gl, &[&vert, &frag])
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }

    /// Returns the raw program name. Never zero for a linked program.
    pub fn id(&self) -> u32 {
        self.id.0.get()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Opens a hidden window with a current GL context.
    ///
    /// The window and context are returned so they outlive the `glow` context.
    pub(crate) fn headless_gl() -> (
        sdl2::VideoSubsystem,
        sdl2::video::Window,
        sdl2::video::GLContext,
        Arc<glow::Context>,
    ) {
        let sdl = sdl2::init().unwrap();
        let video = sdl.video().unwrap();
        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        let window = video
            .window("still-life test", 64, 64)
            .opengl()
            .hidden()
            .build()
            .unwrap();
        let context = window.gl_create_context().unwrap();
        window.gl_make_current(&context).unwrap();
        let gl = unsafe {
            glow::Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _)
        };
        (video, window, context, Arc::new(gl))
    }

    const VALID_VERT: &str = "#version 330 core\nlayout(location = 0) in vec3 p;\nvoid main() { gl_Position = vec4(p, 1.0); }\n";
    const VALID_FRAG: &str = "#version 330 core\nout vec4 c;\nvoid main() { c = vec4(1.0); }\n";

    #[test]
    #[ignore = "requires a display and an OpenGL 3.3 driver"]
    fn test_malformed_vertex_shader_reports_log() {
        let (_video, _window, _context, gl) = headless_gl();
        let err = ShaderProgram::from_sources(&gl, "#version 330 core\nvoid main() { oops }", VALID_FRAG)
            .err()
            .unwrap();
        assert!(err.starts_with("vertex shader compilation failed"));
        assert!(err.len() > "vertex shader compilation failed: ".len());
    }

    #[test]
    #[ignore = "requires a display and an OpenGL 3.3 driver"]
    fn test_malformed_fragment_shader_reports_log() {
        let (_video, _window, _context, gl) = headless_gl();
        let err = ShaderProgram::from_sources(&gl, VALID_VERT, "#version 330 core\nout vec4 c;\nvoid main() { c = ; }")
            .err()
            .unwrap();
        assert!(err.starts_with("fragment shader compilation failed"));
        assert!(err.len() > "fragment shader compilation failed: ".len());
    }

    #[test]
    #[ignore = "requires a display and an OpenGL 3.3 driver"]
    fn test_valid_program_links() {
        let (_video, _window, _context, gl) = headless_gl();
        let program = ShaderProgram::from_sources(&gl, VALID_VERT, VALID_FRAG).unwrap();
        assert_ne!(program.id(), 0);
    }
}
