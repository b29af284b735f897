//! Simple containers to track sprite and atlas images and perform operations
//! on them.

use std::io::{Read, Write};

use thiserror::Error;

const STRIDE: u32 = 4;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Decode(#[from] png::DecodingError),

    #[error(transparent)]
    Encode(#[from] png::EncodingError),

    #[error("PNG color type {0:?} can't be converted to RGBA")]
    UnsupportedColor(png::ColorType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// An 8-bit RGBA image. Every image that passes through the atlas builder is
/// normalized to this format when it's decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    size: (u32, u32),
    data: Vec<u8>,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();

        assert!(data.len() == (size.0 * size.1 * STRIDE) as usize);

        Self { size, data }
    }

    pub fn new_empty_rgba8(size: (u32, u32)) -> Self {
        let data = vec![0; (size.0 * size.1 * STRIDE) as usize];
        Self::new_rgba8(size, data)
    }

    pub fn decode_png<R: Read>(input: R) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(input);

        // Palettes and low bit depths are expanded and 16-bit channels are
        // stripped, which leaves four 8-bit layouts to convert from.
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let (info, mut reader) = decoder.read_info()?;

        let mut data = vec![0; info.buffer_size()];
        reader.next_frame(&mut data)?;

        let data = match info.color_type {
            png::ColorType::RGBA => data,
            png::ColorType::RGB => data
                .chunks_exact(3)
                .flat_map(|rgb| vec![rgb[0], rgb[1], rgb[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => data
                .chunks_exact(2)
                .flat_map(|ga| vec![ga[0], ga[0], ga[0], ga[1]])
                .collect(),
            png::ColorType::Grayscale => data.iter().flat_map(|&g| vec![g, g, g, 255]).collect(),
            other => return Err(ImageError::UnsupportedColor(other)),
        };

        Ok(Self::new_rgba8((info.width, info.height), data))
    }

    /// Reads only the header of a PNG to find its dimensions.
    pub fn read_png_size<R: Read>(input: R) -> Result<(u32, u32), ImageError> {
        let decoder = png::Decoder::new(input);
        let (info, _reader) = decoder.read_info()?;

        Ok((info.width, info.height))
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), ImageError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);
        encoder.set_color(png::ColorType::RGBA);
        encoder.set_depth(png::BitDepth::Eight);

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Copies all of `other` into this image with its top-left corner at
    /// `pos`. `other` must fit entirely inside this image.
    pub fn blit(&mut self, other: &Image, pos: (u32, u32)) {
        assert!(pos.0 + other.size.0 <= self.size.0);
        assert!(pos.1 + other.size.1 <= self.size.1);

        let other_width_bytes = other.size.0 * STRIDE;
        if other_width_bytes == 0 {
            return;
        }

        let other_rows = other.data.chunks_exact(other_width_bytes as usize);

        for (other_y, other_row) in other_rows.enumerate() {
            let self_y = pos.1 + other_y as u32;

            let start_px = pos.0 + self.size.0 * self_y;

            let start_in_bytes = (STRIDE * start_px) as usize;
            let end_in_bytes = start_in_bytes + other_row.len();

            let self_row = &mut self.data[start_in_bytes..end_in_bytes];
            self_row.copy_from_slice(other_row);
        }
    }

    /// Returns a copy of this image turned a quarter turn clockwise, which is
    /// how rotated sprites are stored in an atlas page.
    pub fn rotated_clockwise(&self) -> Image {
        let (width, height) = self.size;
        let mut rotated = Image::new_empty_rgba8((height, width));

        for y in 0..height {
            for x in 0..width {
                rotated.set_pixel((height - 1 - y, x), self.get_pixel((x, y)));
            }
        }

        rotated
    }

    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = (STRIDE * (pos.0 + pos.1 * self.size.0)) as usize;

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }

    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = (STRIDE * (pos.0 + pos.1 * self.size.0)) as usize;

        self.data[start] = pixel.r;
        self.data[start + 1] = pixel.g;
        self.data[start + 2] = pixel.b;
        self.data[start + 3] = pixel.a;
    }
}
