//! Image utilities
//! Keeps us from having to use specific bevy types in the physics engine.
//! The engine paints into anything that implements [RenderSink].

use bevy::render::{
    render_resource::{Extent3d, TextureDimension, TextureFormat},
    texture::Image,
};

use super::vectors::Coord;
use crate::physics::fallingsand::elements::element::Rgb;

/// Something that can paint one grid cell at a time
pub trait RenderSink {
    /// Paint the cell at `pos` as a `cell_size` by `cell_size` block of `color`
    fn draw_cell(&mut self, pos: Coord, color: Rgb, cell_size: usize);
}

/// Fill the block for one cell in a tightly packed RGBA8 buffer.
/// Parts of the block outside the buffer are clipped.
pub fn fill_cell_rgba(
    pixels: &mut [u8],
    width_px: usize,
    height_px: usize,
    pos: Coord,
    color: Rgb,
    cell_size: usize,
) {
    let rgba = color.as_rgba_u8();
    let x0 = pos.x * cell_size;
    let y0 = pos.y * cell_size;
    let x1 = (x0 + cell_size).min(width_px);
    let y1 = (y0 + cell_size).min(height_px);
    if x0 >= x1 {
        return;
    }
    for y in y0..y1 {
        let row = &mut pixels[(y * width_px + x0) * 4..(y * width_px + x1) * 4];
        for pixel in row.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }
}

/// Representing a raw RGBA image
/// Game engine agnostic, full ownership, no lifetimes, not a component
#[derive(Clone, Debug, Default)]
pub struct RawImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RawImage {
    /// A fully transparent image
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// The RGBA value at a pixel
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let start = (y * self.width + x) * 4;
        [
            self.pixels[start],
            self.pixels[start + 1],
            self.pixels[start + 2],
            self.pixels[start + 3],
        ]
    }

    /// Convert to a bevy image
    /// Load this into the image assets to get a texture like the following
    /// ```ignore
    /// let image: RawImage = RawImage::new(64, 64);
    /// let image_handle: Handle<Image> = images.add(image.to_bevy_image());
    /// ```
    pub fn to_bevy_image(self) -> Image {
        let size = Extent3d {
            width: self.width as u32,
            height: self.height as u32,
            depth_or_array_layers: 1,
        };

        Image::new(
            size,
            TextureDimension::D2,
            self.pixels,
            TextureFormat::Rgba8UnormSrgb,
        )
    }
}

impl RenderSink for RawImage {
    fn draw_cell(&mut self, pos: Coord, color: Rgb, cell_size: usize) {
        fill_cell_rgba(
            &mut self.pixels,
            self.width,
            self.height,
            pos,
            color,
            cell_size,
        );
    }
}
