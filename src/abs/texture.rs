//! Structs and functions for handling textures.
//!
//! Loading happens in two steps. [`TextureImage`] decodes a file on the CPU side, checks the
//! channel layout and flips the rows into OpenGL's bottom-left origin. [`Texture`] uploads a
//! decoded image and owns the resulting GPU object.

use std::{path::Path, sync::Arc};

use glow::HasContext;
use image::DynamicImage;

/// Pixel layout of a decoded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgb,
    Rgba,
}

impl TextureFormat {
    /// Picks the format matching a channel count, if it is supported.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Number of bytes per pixel.
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// The sized internal format used for storage on the GPU.
    pub fn internal_format(&self) -> u32 {
        match self {
            Self::Rgb => glow::RGB8,
            Self::Rgba => glow::RGBA8,
        }
    }

    /// The format of the client side pixel data.
    pub fn pixel_format(&self) -> u32 {
        match self {
            Self::Rgb => glow::RGB,
            Self::Rgba => glow::RGBA,
        }
    }
}

/// Reverses the row order of a tightly packed pixel buffer in place.
///
/// Image files store their top row first while OpenGL samples `v = 0` at the bottom.
pub fn flip_vertically(data: &mut [u8], width: usize, height: usize, channels: usize) {
    let stride = width * channels;
    if stride == 0 {
        return;
    }
    for row in 0..height / 2 {
        let mirror = height - 1 - row;
        let (upper, lower) = data.split_at_mut(mirror * stride);
        upper[row * stride..(row + 1) * stride].swap_with_slice(&mut lower[..stride]);
    }
}

/// A decoded image ready to be uploaded.
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
}

impl TextureImage {
    /// Converts a decoded image, rejecting anything that is neither RGB nor RGBA.
    pub fn from_image(image: DynamicImage) -> Result<Self, String> {
        let channels = image.color().channel_count();
        let format = TextureFormat::from_channels(channels)
            .ok_or_else(|| format!("unsupported format: image has {} channels", channels))?;
        let (width, height) = (image.width(), image.height());
        let mut data = match format {
            TextureFormat::Rgb => image.into_rgb8().into_raw(),
            TextureFormat::Rgba => image.into_rgba8().into_raw(),
        };
        flip_vertically(&mut data, width as usize, height as usize, format.channels());

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Opens and decodes the image at `path`.
    pub fn load(path: &Path) -> Result<Self, String> {
        let image = image::open(path).map_err(|e| e.to_string())?;
        Self::from_image(image)
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
    format: TextureFormat,
}

impl Texture {
    /// Uploads a decoded image with repeat wrapping, linear filtering and mipmaps.
    pub fn new(gl: &Arc<glow::Context>, image: &TextureImage) -> Result<Self, String> {
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );

            // RGB rows are not always 4-byte aligned
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                image.format.internal_format() as i32,
                image.width as i32,
                image.height as i32,
                0,
                image.format.pixel_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.data.as_slice())),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width: image.width,
                height: image.height,
                format: image.format,
            })
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel layout the texture was stored with.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
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
    use image::{GrayAlphaImage, ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_rgb_image_keeps_three_channels() {
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let decoded = TextureImage::from_image(DynamicImage::ImageRgb8(image)).unwrap();
        assert_eq!(decoded.format, TextureFormat::Rgb);
        assert_eq!(decoded.format.internal_format(), glow::RGB8);
        assert_eq!(decoded.data.len(), 3 * 2 * 3);
    }

    #[test]
    fn test_rgba_image_keeps_four_channels() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let decoded = TextureImage::from_image(DynamicImage::ImageRgba8(image)).unwrap();
        assert_eq!(decoded.format, TextureFormat::Rgba);
        assert_eq!(decoded.format.pixel_format(), glow::RGBA);
        assert_eq!(decoded.data.len(), 2 * 2 * 4);
    }

    #[test]
    fn test_other_channel_counts_are_rejected() {
        let gray = image::GrayImage::new(4, 4);
        let err = TextureImage::from_image(DynamicImage::ImageLuma8(gray)).unwrap_err();
        assert!(err.contains("unsupported format"));

        let gray_alpha = GrayAlphaImage::new(4, 4);
        assert!(TextureImage::from_image(DynamicImage::ImageLumaA8(gray_alpha)).is_err());
    }

    #[test]
    fn test_decoded_rows_are_bottom_up() {
        // Top row red, bottom row blue
        let image: RgbImage = ImageBuffer::from_fn(2, 2, |_, y| {
            if y == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let decoded = TextureImage::from_image(DynamicImage::ImageRgb8(image)).unwrap();
        assert_eq!(&decoded.data[0..3], &[0, 0, 255]);
        assert_eq!(&decoded.data[6..9], &[255, 0, 0]);
    }

    #[test]
    fn test_flip_twice_is_identity() {
        for (width, height, channels) in [(5, 4, 3), (3, 7, 4), (1, 1, 3), (6, 0, 4)] {
            let original: Vec<u8> = (0..width * height * channels).map(|i| (i * 7 % 251) as u8).collect();
            let mut data = original.clone();
            flip_vertically(&mut data, width, height, channels);
            if height > 1 {
                assert_ne!(data, original);
            }
            flip_vertically(&mut data, width, height, channels);
            assert_eq!(data, original);
        }
    }

    #[test]
    fn test_odd_height_keeps_middle_row() {
        let mut data = vec![1, 1, 1, 2, 2, 2, 3, 3, 3];
        flip_vertically(&mut data, 1, 3, 3);
        assert_eq!(data, vec![3, 3, 3, 2, 2, 2, 1, 1, 1]);
    }

    #[test]
    fn test_missing_file_fails_to_load() {
        let path = std::env::temp_dir().join("still-life-does-not-exist.png");
        assert!(TextureImage::load(&path).is_err());
    }
}
