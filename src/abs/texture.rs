//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture.
//! Image files are decoded with the `image` crate; the pixel layout uploaded to the GPU is
//! chosen per asset through [`PixelFormat`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glow::HasContext;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture data from {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to create GL texture: {0}")]
    Create(String),
}

/// Pixel layout of an uploaded image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    #[default]
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Returns the GL format enum, used both as internal and as client format.
    pub fn gl_format(self) -> u32 {
        match self {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }

    /// Converts the image into tightly packed rows of this format.
    pub fn pixels(self, image: &DynamicImage) -> Vec<u8> {
        match self {
            PixelFormat::Rgb => image.to_rgb8().into_raw(),
            PixelFormat::Rgba => image.to_rgba8().into_raw(),
        }
    }
}

/// Decodes an image file, optionally flipping it so the first row is the bottom one as
/// OpenGL expects.
pub fn load_image(path: impl AsRef<Path>, flip_vertically: bool) -> Result<DynamicImage, TextureError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(if flip_vertically { image.flipv() } else { image })
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Creates a texture object with repeat wrapping and linear filtering but no storage.
    /// Fill it with [`Texture::upload`].
    ///
    /// Sampling an empty texture is valid GL and returns black.
    pub fn empty(gl: &Arc<glow::Context>) -> Result<Self, TextureError> {
        unsafe {
            let texture = gl.create_texture().map_err(TextureError::Create)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width: 0,
                height: 0,
            })
        }
    }

    /// Replaces the texture storage with the given image and regenerates mipmaps.
    pub fn upload(&mut self, image: &DynamicImage, format: PixelFormat) {
        let (width, height) = image.dimensions();
        let data = format.pixels(image);
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
            // Rows of RGB data are not 4-byte aligned in general
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.gl_format() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data.as_slice())),
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
        self.width = width;
        self.height = height;
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind_to_unit(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }

    /// Returns the width of the texture, zero while it is empty.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture, zero while it is empty.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
    }

    #[test]
    fn test_pixels_are_tightly_packed() {
        let image = DynamicImage::new_rgba8(3, 2);
        assert_eq!(PixelFormat::Rgb.pixels(&image).len(), 3 * 2 * 3);
        assert_eq!(PixelFormat::Rgba.pixels(&image).len(), 3 * 2 * 4);
    }

    #[test]
    fn test_flip_puts_last_row_first() {
        let mut buffer = image::RgbaImage::new(1, 2);
        buffer.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        buffer.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        let flipped = DynamicImage::ImageRgba8(buffer).flipv();
        assert_eq!(&PixelFormat::Rgb.pixels(&flipped)[..3], &[0, 0, 255]);
    }

    #[test]
    fn test_bundled_assets_decode() {
        let wall = load_image(asset("wall.png"), true).unwrap();
        assert!(wall.width() > 0 && wall.height() > 0);
        let face = load_image(asset("awesomeface.png"), true).unwrap();
        assert!(face.color().has_alpha());
    }

    #[test]
    fn test_missing_image_is_a_decode_error() {
        let path = asset("missing.png");
        match load_image(&path, true) {
            Err(TextureError::Decode { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("missing image decoded"),
        }
    }

    #[test]
    fn test_format_names() {
        let format: PixelFormat = serde_json::from_str("\"rgba\"").unwrap();
        assert_eq!(format, PixelFormat::Rgba);
        assert_eq!(PixelFormat::Rgb.gl_format(), glow::RGB);
    }
}
