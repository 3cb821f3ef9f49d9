//! The still-life scene and the per-frame renderer.
//!
//! The scene is a fixed list of [`SceneObject`] records rather than a scene graph: six
//! primitive meshes, seven textures and two lights, all known at compile time.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::{Mat4, Vec2, Vec3};
use glow::HasContext;

use crate::{
    abs::{Mesh, ShaderProgram, Texture, TextureImage},
    error::InitError,
    render::geometry::{self, MeshData},
};

const VERTEX_SHADER: &str = include_str!("shaders/phong/vert.glsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/phong/frag.glsl");

/// Texture unit of the base texture.
const BASE_UNIT: u32 = 0;
/// Texture unit of the optional overlay texture.
const EXTRA_UNIT: u32 = 1;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
/// Half extent of the orthographic view box.
pub const ORTHO_EXTENT: f32 = 5.0;

/// The primitive meshes the scene is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Cylinder,
    Cone,
    Plane,
    Sphere,
    Cube,
    Hexagon,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Cylinder,
        Shape::Cone,
        Shape::Plane,
        Shape::Sphere,
        Shape::Cube,
        Shape::Hexagon,
    ];

    /// Builds the CPU side geometry of the shape.
    pub fn generate(self) -> MeshData {
        match self {
            Shape::Cylinder => geometry::cylinder(),
            Shape::Cone => geometry::cone(),
            Shape::Plane => geometry::plane(),
            Shape::Sphere => geometry::sphere(),
            Shape::Cube => geometry::cube(),
            Shape::Hexagon => geometry::hexagon(),
        }
    }
}

/// The textures the scene needs, each backed by one image file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureId {
    BottomCylinderLiquid,
    TopCylinderRibbed,
    Cone,
    Plane,
    Sphere,
    CubeCards,
    Coaster,
}

impl TextureId {
    pub const ALL: [TextureId; 7] = [
        TextureId::BottomCylinderLiquid,
        TextureId::TopCylinderRibbed,
        TextureId::Cone,
        TextureId::Plane,
        TextureId::Sphere,
        TextureId::CubeCards,
        TextureId::Coaster,
    ];

    /// File name of the image, relative to the asset directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TextureId::BottomCylinderLiquid => "bottomcylinderliquid3.jpg",
            TextureId::TopCylinderRibbed => "topcylinderribbed.jpg",
            TextureId::Cone => "cone.jpg",
            TextureId::Plane => "plane.jpg",
            TextureId::Sphere => "tennisball.jpg",
            TextureId::CubeCards => "playingcards.png",
            TextureId::Coaster => "coaster2.jpg",
        }
    }
}

/// Scale, then rotate about an axis, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vec3,
    pub angle: f32,
    pub axis: Vec3,
    pub translation: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_axis_angle(self.axis, self.angle)
            * Mat4::from_scale(self.scale)
    }
}

/// One entry of the draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub shape: Shape,
    pub transform: Transform,
    pub texture: TextureId,
    /// Overlay that replaces the base texture wherever its alpha is non-zero.
    pub extra_texture: Option<TextureId>,
    /// Tiling factor applied to the texture coordinates.
    pub uv_scale: Vec2,
}

const fn object(
    shape: Shape,
    scale: Vec3,
    angle: f32,
    axis: Vec3,
    translation: Vec3,
    texture: TextureId,
    uv_scale: Vec2,
) -> SceneObject {
    SceneObject {
        shape,
        transform: Transform {
            scale,
            angle,
            axis,
            translation,
        },
        texture,
        extra_texture: None,
        uv_scale,
    }
}

/// The draw list, in draw order.
pub const OBJECTS: [SceneObject; 7] = [
    // bottle body
    object(
        Shape::Cylinder,
        Vec3::new(0.85, 2.5, 0.85),
        3.1415,
        Vec3::X,
        Vec3::new(-0.75, 0.501, -5.0),
        TextureId::BottomCylinderLiquid,
        Vec2::new(0.8, 1.0),
    ),
    // bottle neck
    object(
        Shape::Cylinder,
        Vec3::new(0.85, 0.75, 0.85),
        3.1415,
        Vec3::X,
        Vec3::new(-0.75, 1.25, -5.0),
        TextureId::TopCylinderRibbed,
        Vec2::new(0.8, 1.0),
    ),
    // bottle cap
    object(
        Shape::Cone,
        Vec3::new(0.85, 0.5, 0.85),
        0.0,
        Vec3::X,
        Vec3::new(-0.75, 1.25, -5.0),
        TextureId::Cone,
        Vec2::new(0.8, 1.0),
    ),
    object(
        Shape::Plane,
        Vec3::new(2.5, 1.0, 2.5),
        3.1415,
        Vec3::X,
        Vec3::new(0.0, 3.0, -3.0),
        TextureId::Plane,
        Vec2::new(1.0, 1.2),
    ),
    // tennis ball
    object(
        Shape::Sphere,
        Vec3::new(1.01, 1.1, 1.1),
        0.0,
        Vec3::Y,
        Vec3::new(2.25, -0.9, -3.25),
        TextureId::Sphere,
        Vec2::new(1.0, 1.2),
    ),
    // deck of cards
    object(
        Shape::Cube,
        Vec3::new(3.25, 0.75, 2.1),
        std::f32::consts::FRAC_PI_2,
        Vec3::Y,
        Vec3::new(-3.25, -1.615, -1.75),
        TextureId::CubeCards,
        Vec2::new(1.0, 1.0),
    ),
    // coaster
    object(
        Shape::Hexagon,
        Vec3::new(0.4, 0.6, 0.4),
        0.0,
        Vec3::Y,
        Vec3::new(1.5, -1.95, 1.0),
        TextureId::Coaster,
        Vec2::new(1.0, 1.0),
    ),
];

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub position: Vec3,
}

/// Yellowish-white overhead light. This is the only light that attenuates.
pub const OVERHEAD_LIGHT: Light = Light {
    color: Vec3::new(0.90196, 0.84313, 0.76863),
    position: Vec3::new(-0.75, 7.0, -2.0),
};

/// White light coming through the window.
pub const WINDOW_LIGHT: Light = Light {
    color: Vec3::ONE,
    position: Vec3::new(10.0, 3.0, -3.25),
};

/// How the scene is projected onto the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    /// Builds the projection matrix. `fov` is in degrees and only used for perspective.
    pub fn matrix(self, fov: f32, aspect_ratio: f32) -> Mat4 {
        match self {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh_gl(fov.to_radians(), aspect_ratio, NEAR_PLANE, FAR_PLANE)
            }
            ProjectionMode::Orthographic => Mat4::orthographic_rh_gl(
                -ORTHO_EXTENT,
                ORTHO_EXTENT,
                -ORTHO_EXTENT,
                ORTHO_EXTENT,
                NEAR_PLANE,
                FAR_PLANE,
            ),
        }
    }
}

/// Decoded images for every [`TextureId`], in [`TextureId::ALL`] order.
pub struct SceneImages {
    images: Vec<TextureImage>,
}

impl SceneImages {
    /// Decodes every scene image from `dir`. Stops at the first file that fails.
    pub fn load(dir: &Path) -> Result<Self, InitError> {
        let images = TextureId::ALL
            .iter()
            .map(|id| {
                let path: PathBuf = dir.join(id.file_name());
                let image = TextureImage::load(&path)
                    .map_err(|reason| InitError::Texture { path: path.clone(), reason })?;
                log::debug!(
                    "Decoded {} ({}x{}, {:?})",
                    path.display(),
                    image.width,
                    image.height,
                    image.format
                );
                Ok(image)
            })
            .collect::<Result<Vec<_>, InitError>>()?;
        Ok(Self { images })
    }

    pub fn get(&self, id: TextureId) -> &TextureImage {
        &self.images[id as usize]
    }
}

/// Camera dependent inputs of a frame.
pub struct FrameParams {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_position: Vec3,
}

/// GPU resources of the scene. Everything is released when the scene is dropped.
pub struct Scene {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    meshes: Vec<Mesh>,
    textures: Vec<Texture>,
}

impl Scene {
    /// Uploads all meshes and textures and builds the shader program.
    pub fn new(gl: &Arc<glow::Context>, images: &SceneImages) -> Result<Self, InitError> {
        let start = std::time::Instant::now();
        let meshes = Shape::ALL
            .iter()
            .map(|shape| shape.generate().upload(gl))
            .collect::<Result<Vec<_>, String>>()
            .map_err(InitError::Mesh)?;
        log::debug!("Generated {} meshes in {:?}", meshes.len(), start.elapsed());

        let program = ShaderProgram::from_sources(gl, VERTEX_SHADER, FRAGMENT_SHADER)
            .map_err(InitError::Shader)?;

        let textures = TextureId::ALL
            .iter()
            .map(|&id| {
                Texture::new(gl, images.get(id)).map_err(|reason| InitError::Texture {
                    path: PathBuf::from(id.file_name()),
                    reason,
                })
            })
            .collect::<Result<Vec<_>, InitError>>()?;

        program.use_program();
        program.set_uniform("uTextureBase", BASE_UNIT as i32);
        program.set_uniform("uTextureExtra", EXTRA_UNIT as i32);

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            meshes,
            textures,
        })
    }

    pub fn mesh(&self, shape: Shape) -> &Mesh {
        &self.meshes[shape as usize]
    }

    pub fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id as usize]
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Clears the screen and draws every object of [`OBJECTS`].
    pub fn render(&self, frame: &FrameParams) {
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.program.use_program();
        self.program.set_uniform("view", frame.view);
        self.program.set_uniform("projection", frame.projection);
        self.program.set_uniform("lightColor", OVERHEAD_LIGHT.color);
        self.program.set_uniform("lightPos", OVERHEAD_LIGHT.position);
        self.program.set_uniform("windowLightColor", WINDOW_LIGHT.color);
        self.program.set_uniform("windowLightPos", WINDOW_LIGHT.position);
        self.program.set_uniform("viewPosition", frame.view_position);

        for object in &OBJECTS {
            self.program.set_uniform("model", object.transform.matrix());
            self.program.set_uniform("uvScale", object.uv_scale);

            self.texture(object.texture).bind(BASE_UNIT);
            match object.extra_texture {
                Some(extra) => {
                    self.texture(extra).bind(EXTRA_UNIT);
                    self.program.set_uniform("multipleTextures", true);
                }
                None => self.program.set_uniform("multipleTextures", false),
            }

            self.mesh(object.shape).draw();
        }
    }
}
