//! Image file loading and saving
//!
//! Format is picked from the file extension. Only TGA is supported.

pub mod tga;

use crate::error::{RenderError, Result};
use crate::image::Image;
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub use tga::TgaOptions;

/// Formats the codec knows how to read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Tga,
}

impl ImageFormat {
    /// Match a bare extension (no dot), ignoring case
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tga" => Ok(ImageFormat::Tga),
            other => Err(RenderError::unsupported(format!(
                "no codec for extension '{}'",
                other
            ))),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }
}

/// Load an image, dispatching on the extension
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    match ImageFormat::from_path(path)? {
        ImageFormat::Tga => {
            let reader = BufReader::new(File::open(path)?);
            let image = tga::decode(reader)?;
            info!(
                "Loaded {} ({}x{}, {} channels)",
                path.display(),
                image.width(),
                image.height(),
                image.channels()
            );
            Ok(image)
        }
    }
}

/// Save an image uncompressed, dispatching on the extension
pub fn save_image<P: AsRef<Path>>(image: &Image, path: P) -> Result<()> {
    save_image_with(image, path, TgaOptions::default())
}

/// Save with explicit TGA options (e.g. RLE packets)
pub fn save_image_with<P: AsRef<Path>>(image: &Image, path: P, options: TgaOptions) -> Result<()> {
    let path = path.as_ref();
    match ImageFormat::from_path(path)? {
        ImageFormat::Tga => {
            let mut writer = BufWriter::new(File::create(path)?);
            tga::encode(image, &mut writer, options)?;
            writer.flush()?;
            info!("Saved {} ({}x{})", path.display(), image.width(), image.height());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use test_log::test;

    fn patterned(width: usize, height: usize, channels: usize, seed: usize) -> Image {
        let data = (0..width * height * channels)
            .map(|i| ((i * 131 + seed * 17) % 256) as u8)
            .collect();
        Image::from_bytes(width, height, channels, data).unwrap()
    }

    #[test]
    fn extension_dispatch() {
        assert_eq!(ImageFormat::from_path("a/b/c.tga").unwrap(), ImageFormat::Tga);
        assert_eq!(ImageFormat::from_path("C.TGA").unwrap(), ImageFormat::Tga);
        assert_eq!(
            ImageFormat::from_path("photo.png").unwrap_err().kind(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(
            ImageFormat::from_path("no_extension").unwrap_err().kind(),
            ErrorKind::UnsupportedFormat
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let sizes = [(1, 1), (2, 3), (17, 5), (64, 64), (33, 64)];
        for &channels in &[1, 3, 4] {
            for (seed, &(w, h)) in sizes.iter().enumerate() {
                let original = patterned(w, h, channels, seed);
                let path = dir.path().join(format!("rt_{}_{}x{}.tga", channels, w, h));
                save_image(&original, &path).unwrap();
                let loaded = load_image(&path).unwrap();
                assert_eq!(loaded, original, "{}x{}x{}", w, h, channels);
            }
        }
    }

    #[test]
    fn rle_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut img = Image::new(40, 6, 3).unwrap();
        for y in 0..6 {
            for x in 0..40 {
                let v = if x < 20 { 200 } else { (x * 7 + y) as u8 };
                img.pixel_mut(x, y).unwrap().copy_from_slice(&[v, v / 2, 3]);
            }
        }
        let path = dir.path().join("rle.tga");
        save_image_with(&img, &path, TgaOptions { rle: true }).unwrap();
        let raw_len = 18 + img.data_size();
        assert!(std::fs::metadata(&path).unwrap().len() < raw_len as u64);
        assert_eq!(load_image(&path).unwrap(), img);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("absent.tga")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn unknown_extension_is_rejected_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmp");
        let err = save_image(&Image::default(), &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(!path.exists());
    }

    #[test]
    fn saved_files_decode_with_independent_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let mut img = Image::new(3, 2, 3).unwrap();
        // Bottom row (y = 0) blue, top row (y = 1) red; bytes are BGR.
        for x in 0..3 {
            img.pixel_mut(x, 0).unwrap().copy_from_slice(&[255, 0, 0]);
            img.pixel_mut(x, 1).unwrap().copy_from_slice(&[0, 0, 255]);
        }
        let path = dir.path().join("interop.tga");
        save_image(&img, &path).unwrap();

        let decoded = ::image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        // The other decoder reports top-left origin.
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(2, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn rle_files_decode_with_independent_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let img = Image::from_bytes(4, 1, 1, vec![9, 9, 9, 200]).unwrap();
        let path = dir.path().join("gray_rle.tga");
        save_image_with(&img, &path, TgaOptions { rle: true }).unwrap();

        let decoded = ::image::open(&path).unwrap().to_luma8();
        assert_eq!(decoded.into_raw(), vec![9, 9, 9, 200]);
    }
}
