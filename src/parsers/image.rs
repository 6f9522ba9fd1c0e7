//! Image dimension sniffing.

use std::io::Cursor;

use image::ImageReader;

use crate::core::{ImageDimensions, ImageSizeFailure};

// ICONDIR layout: reserved (2 bytes), type (2), image count (2), then one
// 16-byte directory entry per embedded image
const ICO_HEADER_SIZE: usize = 6;
const ICO_ENTRY_SIZE: usize = 16;

/// Reads pixel dimensions out of a downloaded image buffer.
///
/// Icon containers hold multiple embedded images; the reported size is the
/// largest width and the largest height across all of them, each picked
/// independently. Every other format is handed to the `image` crate, which
/// only decodes as far as the header.
pub fn sniff_dimensions(data: &[u8]) -> Result<ImageDimensions, ImageSizeFailure> {
    if is_icon_container(data) {
        return icon_container_dimensions(data);
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|err| ImageSizeFailure::Unreadable(err.to_string()))?;

    match reader.into_dimensions() {
        Ok((width, height)) => Ok(ImageDimensions { width, height }),
        Err(err) => Err(ImageSizeFailure::Unreadable(err.to_string())),
    }
}

/// ICO and CUR payloads: reserved field zero, type 1 (icon) or 2 (cursor).
fn is_icon_container(data: &[u8]) -> bool {
    data.len() >= ICO_HEADER_SIZE
        && data[0] == 0
        && data[1] == 0
        && (data[2] == 1 || data[2] == 2)
        && data[3] == 0
}

fn icon_container_dimensions(data: &[u8]) -> Result<ImageDimensions, ImageSizeFailure> {
    let count = u16::from_le_bytes([data[4], data[5]]) as usize;

    if count == 0 {
        return Err(ImageSizeFailure::Unreadable(String::from(
            "icon container holds no images",
        )));
    }
    if data.len() < ICO_HEADER_SIZE + count * ICO_ENTRY_SIZE {
        return Err(ImageSizeFailure::Unreadable(String::from(
            "truncated icon directory",
        )));
    }

    let mut width: u32 = 0;
    let mut height: u32 = 0;

    for index in 0..count {
        let entry = ICO_HEADER_SIZE + index * ICO_ENTRY_SIZE;
        width = width.max(icon_entry_extent(data[entry]));
        height = height.max(icon_entry_extent(data[entry + 1]));
    }

    Ok(ImageDimensions { width, height })
}

// A zero extent byte stands for 256 pixels
fn icon_entry_extent(value: u8) -> u32 {
    if value == 0 {
        256
    } else {
        u32::from(value)
    }
}
