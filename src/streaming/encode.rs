use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};

use crate::capture::VideoFrame;
use crate::error::CaptureError;

/// Encode a frame as a JPEG data URL (`data:image/jpeg;base64,...`)
pub fn encode_frame(frame: &VideoFrame, quality: u8) -> Result<String, CaptureError> {
    let img: ImageBuffer<Rgb<u8>, &[u8]> =
        ImageBuffer::from_raw(frame.width, frame.height, frame.rgb.as_slice()).ok_or_else(|| {
            CaptureError::device(format!(
                "Frame buffer does not match {}x{}",
                frame.width, frame.height
            ))
        })?;

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .encode_image(&img)
        .map_err(|e| CaptureError::device(format!("JPEG encode failed: {}", e)))?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&jpeg)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_produces_jpeg_data_url() {
        let frame = VideoFrame {
            rgb: vec![128; 4 * 4 * 3],
            width: 4,
            height: 4,
            timestamp_ms: 0,
        };

        let url = encode_frame(&frame, 80).unwrap();
        let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        let jpeg = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let frame = VideoFrame {
            rgb: vec![0; 5],
            width: 4,
            height: 4,
            timestamp_ms: 0,
        };
        assert!(encode_frame(&frame, 80).is_err());
    }
}
