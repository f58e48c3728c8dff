//! Truevision TGA codec
//!
//! Reads uncompressed and RLE truecolor/grayscale files at 8, 24 or 32 bits
//! per pixel. Pixel bytes are kept in file order (B, G, R, A).
//!
//! Orientation: images are held bottom-left origin. Saved files carry a zero
//! descriptor (bottom-left, left to right) so a save/load pair is the
//! identity; files with the top-origin or right-to-left bits set are flipped
//! on load.

use crate::error::{RenderError, Result};
use crate::image::Image;
use log::debug;
use std::io::{self, Read, Write};

pub const HEADER_SIZE: usize = 18;

/// Descriptor bit: first stored row is the top of the picture
pub const DESC_TOP_ORIGIN: u8 = 0x20;
/// Descriptor bit: pixels within a row run right to left
pub const DESC_RIGHT_ORIGIN: u8 = 0x10;

/// Largest pixel count one packet can describe
const MAX_PACKET_PIXELS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Truecolor = 2,
    Grayscale = 3,
    RleTruecolor = 10,
    RleGrayscale = 11,
}

impl ImageType {
    fn from_byte(b: u8) -> Result<Self> {
        match b {
            2 => Ok(ImageType::Truecolor),
            3 => Ok(ImageType::Grayscale),
            10 => Ok(ImageType::RleTruecolor),
            11 => Ok(ImageType::RleGrayscale),
            other => Err(RenderError::unsupported(format!("TGA image type {}", other))),
        }
    }

    pub fn is_rle(self) -> bool {
        matches!(self, ImageType::RleTruecolor | ImageType::RleGrayscale)
    }
}

/// Save options
#[derive(Debug, Clone, Copy, Default)]
pub struct TgaOptions {
    /// Write RLE packets (image type 10/11) instead of raw pixels
    pub rle: bool,
}

/// The fixed 18-byte header, validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TgaHeader {
    pub image_type: ImageType,
    pub width: u16,
    pub height: u16,
    pub depth: u8,
    pub descriptor: u8,
}

impl TgaHeader {
    pub fn parse(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let id_length = bytes[0];
        if id_length != 0 {
            return Err(RenderError::unsupported(format!(
                "TGA image id field ({} bytes)",
                id_length
            )));
        }
        let image_type = ImageType::from_byte(bytes[2])?;
        let width = u16::from_le_bytes([bytes[12], bytes[13]]);
        let height = u16::from_le_bytes([bytes[14], bytes[15]]);
        if width == 0 || height == 0 {
            return Err(RenderError::corrupt(format!(
                "TGA declares {}x{} image",
                width, height
            )));
        }
        let depth = bytes[16];
        if !matches!(depth, 8 | 24 | 32) {
            return Err(RenderError::unsupported(format!("TGA bit depth {}", depth)));
        }

        Ok(Self {
            image_type,
            width,
            height,
            depth,
            descriptor: bytes[17],
        })
    }

    /// Header for saving `image` with our bottom-left convention
    pub fn for_image(image: &Image, options: TgaOptions) -> Result<Self> {
        let width = u16::try_from(image.width())
            .map_err(|_| RenderError::invalid(format!("width {} exceeds TGA limit", image.width())))?;
        let height = u16::try_from(image.height())
            .map_err(|_| RenderError::invalid(format!("height {} exceeds TGA limit", image.height())))?;
        let depth = match image.channels() {
            1 => 8,
            3 => 24,
            4 => 32,
            other => {
                return Err(RenderError::unsupported(format!(
                    "cannot write {}-channel image as TGA",
                    other
                )))
            }
        };
        let image_type = match (image.channels() >= 3, options.rle) {
            (true, false) => ImageType::Truecolor,
            (false, false) => ImageType::Grayscale,
            (true, true) => ImageType::RleTruecolor,
            (false, true) => ImageType::RleGrayscale,
        };

        Ok(Self {
            image_type,
            width,
            height,
            depth,
            descriptor: 0,
        })
    }

    pub fn channels(&self) -> usize {
        self.depth as usize / 8
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[2] = self.image_type as u8;
        header[12..14].copy_from_slice(&self.width.to_le_bytes());
        header[14..16].copy_from_slice(&self.height.to_le_bytes());
        header[16] = self.depth;
        header[17] = self.descriptor;
        header
    }
}

/// Decode a whole TGA stream
///
/// The pixel store grows with the bytes actually read, so a header that
/// promises more data than the stream holds fails with `UnexpectedEof`
/// instead of allocating the full size up front.
pub fn decode<R: Read>(mut reader: R) -> Result<Image> {
    let mut raw_header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut raw_header)?;
    let header = TgaHeader::parse(&raw_header)?;
    debug!("TGA header: {:?}", header);

    let (width, height, channels) = (header.width as usize, header.height as usize, header.channels());
    let len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| RenderError::corrupt(format!("{}x{} image overflows memory", width, height)))?;

    let mut data = Vec::new();
    if header.image_type.is_rle() {
        expand_rle(&mut reader, channels, len, &mut data)?;
    } else {
        reader.by_ref().take(len as u64).read_to_end(&mut data)?;
        if data.len() < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("pixel data ends after {} of {} bytes", data.len(), len),
            )
            .into());
        }
    }

    let mut image = Image::from_bytes(width, height, channels, data)?;
    if header.descriptor & DESC_TOP_ORIGIN != 0 {
        image.flip_vertical();
    }
    if header.descriptor & DESC_RIGHT_ORIGIN != 0 {
        image.flip_horizontal();
    }
    Ok(image)
}

/// Expand RLE packets until `out` is exactly full.
///
/// A packet reaching past the end of `out` is corrupt data; a stream that
/// stops early surfaces as an `UnexpectedEof` I/O error.
pub fn decode_rle<R: Read>(reader: &mut R, channels: usize, out: &mut [u8]) -> Result<()> {
    let mut data = Vec::with_capacity(out.len());
    expand_rle(reader, channels, out.len(), &mut data)?;
    out.copy_from_slice(&data);
    Ok(())
}

/// Append decoded packets to `out` until it holds `total` bytes
fn expand_rle<R: Read>(reader: &mut R, channels: usize, total: usize, out: &mut Vec<u8>) -> Result<()> {
    if !(1..=4).contains(&channels) {
        return Err(RenderError::invalid(format!("channel count {}", channels)));
    }
    let mut pixel = [0u8; 4];
    let mut literal = [0u8; MAX_PACKET_PIXELS * 4];

    while out.len() < total {
        let mut control = [0u8; 1];
        reader.read_exact(&mut control)?;
        let count = (control[0] & 0x7f) as usize + 1;
        let span = count * channels;
        if out.len() + span > total {
            return Err(RenderError::corrupt(format!(
                "RLE packet of {} pixels overruns buffer at byte {} of {}",
                count,
                out.len(),
                total
            )));
        }

        if control[0] & 0x80 != 0 {
            reader.read_exact(&mut pixel[..channels])?;
            for _ in 0..count {
                out.extend_from_slice(&pixel[..channels]);
            }
        } else {
            reader.read_exact(&mut literal[..span])?;
            out.extend_from_slice(&literal[..span]);
        }
    }
    Ok(())
}

/// Encode an image: header followed by raw or RLE pixel data
pub fn encode<W: Write>(image: &Image, writer: &mut W, options: TgaOptions) -> Result<()> {
    let header = TgaHeader::for_image(image, options)?;
    writer.write_all(&header.to_bytes())?;
    if options.rle {
        let stride = image.width() * image.channels();
        let mut packets = Vec::with_capacity(image.data_size());
        for row in image.data().chunks_exact(stride) {
            encode_rle_row(row, image.channels(), &mut packets);
        }
        writer.write_all(&packets)?;
    } else {
        writer.write_all(image.data())?;
    }
    Ok(())
}

/// Append RLE packets for one scanline. Runs of two or more identical pixels
/// become run packets; everything else is grouped into raw packets.
pub fn encode_rle_row(row: &[u8], channels: usize, out: &mut Vec<u8>) {
    let pixels: Vec<&[u8]> = row.chunks_exact(channels).collect();
    let n = pixels.len();
    let mut i = 0;

    while i < n {
        let mut run = 1;
        while i + run < n && run < MAX_PACKET_PIXELS && pixels[i + run] == pixels[i] {
            run += 1;
        }

        if run > 1 {
            out.push(0x80 | (run - 1) as u8);
            out.extend_from_slice(pixels[i]);
            i += run;
            continue;
        }

        let start = i;
        i += 1;
        while i < n && i - start < MAX_PACKET_PIXELS && !(i + 1 < n && pixels[i] == pixels[i + 1]) {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        for p in &pixels[start..i] {
            out.extend_from_slice(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    fn header(image_type: u8, width: u16, height: u16, depth: u8, descriptor: u8) -> Vec<u8> {
        let mut h = vec![0u8; HEADER_SIZE];
        h[2] = image_type;
        h[12..14].copy_from_slice(&width.to_le_bytes());
        h[14..16].copy_from_slice(&height.to_le_bytes());
        h[16] = depth;
        h[17] = descriptor;
        h
    }

    #[test]
    fn rle_run_then_raw_packet() {
        let stream = [0x83, 10, 20, 30, 0x02, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut out = vec![0u8; 7 * 3];
        decode_rle(&mut Cursor::new(&stream[..]), 3, &mut out).unwrap();
        assert_eq!(
            out,
            vec![10, 20, 30, 10, 20, 30, 10, 20, 30, 10, 20, 30, 1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn rle_short_stream_fails() {
        let stream = [0x83, 10, 20, 30, 0x02, 1, 2, 3, 4];
        let mut out = vec![0u8; 7 * 3];
        let err = decode_rle(&mut Cursor::new(&stream[..]), 3, &mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn rle_packet_past_end_is_corrupt() {
        let stream = [0x83, 10, 20, 30, 0x83, 1, 2, 3];
        let mut out = vec![0u8; 6 * 3];
        let err = decode_rle(&mut Cursor::new(&stream[..]), 3, &mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptData);
    }

    #[test]
    fn header_rejects_unsupported_fields() {
        let mut with_id = header(2, 1, 1, 24, 0);
        with_id[0] = 4;
        let err = decode(Cursor::new(with_id)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

        let err = decode(Cursor::new(header(1, 1, 1, 8, 0))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

        let err = decode(Cursor::new(header(2, 1, 1, 16, 0))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

        let err = decode(Cursor::new(header(2, 0, 1, 24, 0))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptData);
    }

    #[test]
    fn truncated_header_and_body_are_io_errors() {
        let err = decode(Cursor::new(vec![0u8; 10])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let mut file = header(3, 2, 2, 8, 0);
        file.extend_from_slice(&[1, 2, 3]);
        let err = decode(Cursor::new(file)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn header_only_max_size_files_fail_without_allocating() {
        for image_type in [2, 10] {
            let err = decode(Cursor::new(header(image_type, 65535, 65535, 32, 0))).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Io);
        }
    }

    #[test]
    fn max_size_file_with_short_body_is_io_error() {
        let mut file = header(2, 65535, 65535, 24, 0);
        file.extend_from_slice(&[7; 300]);
        let err = decode(Cursor::new(file)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn rle_grayscale_file() {
        let mut file = header(11, 3, 2, 8, 0);
        file.extend_from_slice(&[0x82, 7, 0x02, 1, 2, 3]);
        let img = decode(Cursor::new(file)).unwrap();
        assert_eq!(img.channels(), 1);
        assert_eq!(img.data(), &[7, 7, 7, 1, 2, 3]);
    }

    #[test]
    fn top_origin_files_are_flipped_to_bottom_left() {
        let mut file = header(3, 2, 2, 8, DESC_TOP_ORIGIN);
        file.extend_from_slice(&[1, 2, 3, 4]);
        let img = decode(Cursor::new(file)).unwrap();
        assert_eq!(img.row(0).unwrap(), &[3, 4]);
        assert_eq!(img.row(1).unwrap(), &[1, 2]);
    }

    #[test]
    fn right_origin_files_are_mirrored() {
        let mut file = header(2, 2, 1, 24, DESC_RIGHT_ORIGIN);
        file.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let img = decode(Cursor::new(file)).unwrap();
        assert_eq!(img.data(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn encode_writes_header_fields() {
        let img = Image::new(300, 2, 4).unwrap();
        let mut bytes = Vec::new();
        encode(&img, &mut bytes, TgaOptions::default()).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 300 * 2 * 4);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[2], 2);
        assert_eq!(&bytes[12..16], &[0x2c, 0x01, 0x02, 0x00]);
        assert_eq!(bytes[16], 32);
        assert_eq!(bytes[17], 0);

        let gray = Image::new(1, 1, 1).unwrap();
        let mut bytes = Vec::new();
        encode(&gray, &mut bytes, TgaOptions::default()).unwrap();
        assert_eq!((bytes[2], bytes[16]), (3, 8));
    }

    #[test]
    fn two_channel_images_cannot_be_saved() {
        let img = Image::new(1, 1, 2).unwrap();
        let err = encode(&img, &mut Vec::new(), TgaOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn rle_row_packets() {
        let mut out = Vec::new();
        encode_rle_row(&[5, 5, 5, 1, 2, 9, 9], 1, &mut out);
        assert_eq!(out, vec![0x82, 5, 0x01, 1, 2, 0x81, 9]);
    }

    #[test]
    fn rle_runs_split_at_packet_limit() {
        let row = vec![4u8; 130];
        let mut out = Vec::new();
        encode_rle_row(&row, 1, &mut out);
        assert_eq!(out, vec![0xff, 4, 0x81, 4]);

        let mut decoded = vec![0u8; 130];
        decode_rle(&mut Cursor::new(out), 1, &mut decoded).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn rle_encoded_image_decodes_back() {
        let data: Vec<u8> = (0..5 * 4 * 4).map(|i| if i % 12 < 8 { 0 } else { i as u8 }).collect();
        let img = Image::from_bytes(5, 4, 4, data).unwrap();
        let mut bytes = Vec::new();
        encode(&img, &mut bytes, TgaOptions { rle: true }).unwrap();
        assert_eq!(bytes[2], 10);
        assert_eq!(decode(Cursor::new(bytes)).unwrap(), img);
    }
}
