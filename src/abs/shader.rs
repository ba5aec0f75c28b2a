//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! Shader sources are read from disk through [`ShaderSources`], either from two explicit paths
//! or from a common base name with `.vert` / `.frag` suffixes.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::Mat4;
use glow::HasContext;

/// The programmable pipeline stage a shader belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Returns the GL enum used to create a shader object of this stage.
    pub fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source {}: {source}", path.display())]
    Read {
        stage: ShaderStage,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create GL object: {0}")]
    Create(String),
    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link shader program: {log}")]
    Link { log: String },
    #[error("shader program was not built from files and cannot be reloaded")]
    NoSources,
}

/// Locations of a vertex/fragment shader pair on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Source text of a vertex/fragment shader pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn from_paths(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Resolves `<base>.vert` and `<base>.frag`.
    ///
    /// The suffix is appended to the base name rather than replacing an extension, so
    /// `shaders/cube.v2` resolves to `shaders/cube.v2.vert`.
    pub fn from_name(base: impl AsRef<Path>) -> Self {
        let with_suffix = |suffix: &str| {
            let mut path = OsString::from(base.as_ref().as_os_str());
            path.push(suffix);
            PathBuf::from(path)
        };
        Self {
            vertex: with_suffix(".vert"),
            fragment: with_suffix(".frag"),
        }
    }

    /// Reads both source files fully into memory.
    pub fn load(&self) -> Result<LoadedSources, ShaderError> {
        let read = |stage: ShaderStage, path: &Path| {
            std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
                stage,
                path: path.to_path_buf(),
                source,
            })
        };
        Ok(LoadedSources {
            vertex: read(ShaderStage::Vertex, &self.vertex)?,
            fragment: read(ShaderStage::Fragment, &self.fragment)?,
        })
    }
}

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        unsafe {
            let shader = gl.create_shader(stage.gl_type()).map_err(ShaderError::Create)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ShaderError::Compile { stage, log });
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
///
/// The location is looked up by name on every call. Names the linked program does not
/// know about resolve to no location and the write is skipped.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_f32(Some(&loc), *self);
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

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

/// A raw column-major 4x4 matrix, as produced by [`crate::projection::perspective`].
impl Uniform for [f32; 16] {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self);
            }
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        (*self).set_uniform(gl, program, name);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
///
/// The program is deleted when the value is dropped. It is deliberately not `Clone`:
/// a second, independent program over the same files is created with
/// [`ShaderProgram::reload`].
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
    sources: Option<ShaderSources>,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, ShaderError> {
        unsafe {
            let program = gl.create_program().map_err(ShaderError::Create)?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ShaderError::Link { log });
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
                sources: None,
            })
        }
    }

    /// Compiles and links a program from a vertex and a fragment shader source.
    pub fn from_source(gl: &Arc<glow::Context>, vertex: &str, fragment: &str) -> Result<Self, ShaderError> {
        let vert = Shader::new(gl, ShaderStage::Vertex, vertex)?;
        let frag = Shader::new(gl, ShaderStage::Fragment, fragment)?;
        Self::new(gl, &[&vert, &frag])
    }

    /// Reads, compiles and links the shader pair at the given locations.
    ///
    /// Failures are logged with the driver's diagnostics before being returned.
    pub fn from_sources(gl: &Arc<glow::Context>, sources: ShaderSources) -> Result<Self, ShaderError> {
        log::info!(
            "Loading shader program from {} and {}",
            sources.vertex.display(),
            sources.fragment.display()
        );

        let result = sources
            .load()
            .and_then(|loaded| Self::from_source(gl, &loaded.vertex, &loaded.fragment));

        match result {
            Ok(mut program) => {
                program.sources = Some(sources);
                Ok(program)
            }
            Err(e) => {
                log::error!("{e}");
                Err(e)
            }
        }
    }

    /// Like [`ShaderProgram::from_name`] for files that don't share a base name.
    pub fn from_files(
        gl: &Arc<glow::Context>,
        vertex: impl Into<PathBuf>,
        fragment: impl Into<PathBuf>,
    ) -> Result<Self, ShaderError> {
        Self::from_sources(gl, ShaderSources::from_paths(vertex, fragment))
    }

    /// Loads `<base>.vert` and `<base>.frag`.
    pub fn from_name(gl: &Arc<glow::Context>, base: impl AsRef<Path>) -> Result<Self, ShaderError> {
        Self::from_sources(gl, ShaderSources::from_name(base))
    }

    /// Builds a new, independently owned program from the same source files.
    pub fn reload(&self) -> Result<Self, ShaderError> {
        let sources = self.sources.clone().ok_or(ShaderError::NoSources)?;
        Self::from_sources(&self.gl, sources)
    }

    /// Returns the files this program was built from, if any.
    pub fn sources(&self) -> Option<&ShaderSources> {
        self.sources.as_ref()
    }

    /// Returns the underlying GL program object.
    pub fn handle(&self) -> glow::Program {
        self.id
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program.
    ///
    /// The program has to be bound with [`ShaderProgram::use_program`] first.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
