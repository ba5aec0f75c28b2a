//! The spinning cube.
//!
//! [`CubeDemo`] owns every GPU resource of the demo and issues the per-frame
//! uniform updates and the single indexed draw call.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;
use sdl2::event::WindowEvent;

use crate::{
    abs::{Mesh, PixelFormat, ShaderError, ShaderProgram, Texture, TextureError, load_image},
    config::DemoConfig,
    cube::{CUBE_VERTICES, CullMode, cube_indices},
    projection::{Projection, ProjectionError},
};

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("invalid camera: {0}")]
    Projection(#[from] ProjectionError),
    #[error("failed to upload mesh: {0}")]
    Mesh(String),
}

/// Rotation of the cube `t` seconds into the animation: a turn around Y applied after a
/// turn around X, both at one radian per second.
pub fn model_matrix(t: f32) -> Mat4 {
    Mat4::from_rotation_y(t) * Mat4::from_rotation_x(t)
}

/// Moves the scene `distance` units away from the eye along -Z.
pub fn view_matrix(distance: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -distance))
}

/// Sampler uniforms of the cube shader, one per texture unit in order.
pub const TEXTURE_SAMPLERS: [&str; 2] = ["uTextureA", "uTextureB"];

/// Whether a window event changes the drawable size. SDL reports every size change as
/// `SizeChanged` and additionally as `Resized` when it came from outside, so only the
/// former is followed.
pub fn resizes_drawable(event: &WindowEvent) -> bool {
    matches!(event, WindowEvent::SizeChanged(..))
}

/// Width over height, `None` for a collapsed viewport.
pub fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    if width == 0 || height == 0 {
        None
    } else {
        Some(width as f32 / height as f32)
    }
}

pub struct CubeDemo {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    mesh: Mesh,
    textures: Vec<Texture>,
    projection: Projection,
    cull_mode: CullMode,
    clear_color: [f32; 4],
    camera_distance: f32,
}

impl CubeDemo {
    /// Compiles the shader, uploads textures and geometry and configures fixed GL state
    /// for a drawable of the given size.
    pub fn new(gl: &Arc<glow::Context>, config: &DemoConfig, drawable: (u32, u32)) -> Result<Self, DemoError> {
        let projection = config
            .camera
            .projection(aspect_ratio(drawable.0, drawable.1).unwrap_or(1.0))?;

        let program = ShaderProgram::from_name(gl, config.resolve(&config.shader))?;

        let mut textures = Vec::with_capacity(TEXTURE_SAMPLERS.len());
        for texture in &config.textures {
            textures.push(Self::load_texture(gl, &config.resolve(&texture.path), texture.format)?);
        }

        let indices = cube_indices(config.cull_mode);
        let mesh = Mesh::new(gl, &CUBE_VERTICES, indices, glow::TRIANGLES).map_err(DemoError::Mesh)?;
        log::info!(
            "Uploaded {} vertices ({} bytes) and {} indices ({} bytes), {} bytes in total",
            CUBE_VERTICES.len(),
            mesh.vertex_bytes(),
            mesh.index_count(),
            mesh.index_bytes(),
            mesh.vertex_bytes() + mesh.index_bytes()
        );

        unsafe {
            gl.viewport(0, 0, drawable.0 as i32, drawable.1 as i32);
            gl.front_face(glow::CW);
            match config.cull_mode {
                CullMode::CullFace => {
                    gl.enable(glow::CULL_FACE);
                    gl.cull_face(glow::BACK);
                }
                CullMode::DepthTest => gl.enable(glow::DEPTH_TEST),
            }
        }

        program.use_program();
        for (unit, (sampler, _)) in TEXTURE_SAMPLERS.iter().zip(&textures).enumerate() {
            program.set_uniform(sampler, unit as i32);
        }

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            mesh,
            textures,
            projection,
            cull_mode: config.cull_mode,
            clear_color: config.clear_color,
            camera_distance: config.camera.distance,
        })
    }

    /// Creates the texture object and fills it from `path`. A file that cannot be
    /// decoded is logged and leaves the texture empty.
    fn load_texture(gl: &Arc<glow::Context>, path: &std::path::Path, format: PixelFormat) -> Result<Texture, DemoError> {
        let mut texture = Texture::empty(gl)?;
        match load_image(path, true) {
            Ok(image) => {
                texture.upload(&image, format);
                log::debug!(
                    "Loaded texture {} ({}x{})",
                    path.display(),
                    texture.width(),
                    texture.height()
                );
            }
            Err(e) => log::error!("Error loading texture data: {e}"),
        }
        Ok(texture)
    }

    /// Follows a change of the drawable size.
    pub fn resize(&mut self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
        match aspect_ratio(width, height).map(|aspect| self.projection.set_aspect(aspect)) {
            Some(Ok(())) => log::debug!("Resized to {width}x{height}"),
            Some(Err(e)) => log::warn!("Keeping previous projection: {e}"),
            None => log::debug!("Ignoring resize to {width}x{height}"),
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Draws one frame, `t` seconds into the animation.
    pub fn render(&self, t: f32) {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            match self.cull_mode {
                CullMode::CullFace => self.gl.clear(glow::COLOR_BUFFER_BIT),
                CullMode::DepthTest => self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT),
            }
        }

        self.program.use_program();
        self.program.set_uniform("uTime", t);
        self.program.set_uniform("uModel", model_matrix(t));
        self.program.set_uniform("uView", view_matrix(self.camera_distance));
        self.program.set_uniform("uProj", self.projection.matrix());

        for (unit, texture) in self.textures.iter().enumerate() {
            texture.bind_to_unit(unit as u32);
        }

        self.mesh.draw();
    }
}
