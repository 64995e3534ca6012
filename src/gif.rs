//! GIF animation encoding

use std::fs;
use std::io;
use std::path::Path;

use gif::{DisposalMethod, Encoder, Frame, Repeat};
use image::RgbaImage;

use crate::error::Result;

/// Frame delay used when nothing else is configured.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 600;

/// Encode frames as a looping GIF in memory.
///
/// Each frame restores the background before the next one is drawn, so
/// transparent regions never show the previous frame.
pub fn encode_gif(frames: &[RgbaImage], delay_ms: u32) -> Result<Vec<u8>> {
    let Some(first) = frames.first() else {
        return Ok(Vec::new());
    };
    let (width, height) = gif_dimensions(first)?;

    // GIF uses centiseconds
    let delay_cs = (delay_ms / 10).clamp(1, u16::MAX as u32) as u16;

    let mut bytes = Vec::new();
    {
        let mut encoder = Encoder::new(&mut bytes, width, height, &[])?;
        encoder.set_repeat(Repeat::Infinite)?;
        for image in frames {
            if gif_dimensions(image)? != (width, height) {
                return Err(invalid_input("all frames must share one size").into());
            }
            let mut pixels = image.as_raw().clone();
            let mut frame = Frame::from_rgba_speed(width, height, &mut pixels, 10);
            frame.delay = delay_cs;
            frame.dispose = DisposalMethod::Background;
            encoder.write_frame(&frame)?;
        }
    }
    Ok(bytes)
}

/// Encode frames and write them to `path`.
pub fn render_gif(frames: &[RgbaImage], delay_ms: u32, path: &Path) -> Result<()> {
    if frames.is_empty() {
        return Ok(());
    }
    let bytes = encode_gif(frames, delay_ms)?;

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

fn gif_dimensions(image: &RgbaImage) -> Result<(u16, u16)> {
    let width = u16::try_from(image.width()).map_err(|_| invalid_input("frame too wide for GIF"))?;
    let height = u16::try_from(image.height()).map_err(|_| invalid_input("frame too tall for GIF"))?;
    Ok((width, height))
}

fn invalid_input(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message.to_string())
}
