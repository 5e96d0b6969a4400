//! PNG snapshot export with the viewport embedded as tEXt chunks.

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use shaderbrot_core::{Bounds, ViewportState};

use crate::buffer::RenderBuffer;

/// Viewport values written alongside the pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotMetadata {
    pub bounds: Bounds,
    pub iterations: u32,
    pub zoom: f64,
}

impl SnapshotMetadata {
    pub fn from_state(state: &ViewportState) -> Self {
        Self {
            bounds: state.bounds(),
            iterations: state.iterations(),
            zoom: state.zoom_factor(),
        }
    }

    fn text_pairs(&self) -> Vec<(String, String)> {
        let b = &self.bounds;
        vec![
            ("Shaderbrot.MinX".into(), format!("{:.17e}", b.min_x())),
            ("Shaderbrot.MaxX".into(), format!("{:.17e}", b.max_x())),
            ("Shaderbrot.MinY".into(), format!("{:.17e}", b.min_y())),
            ("Shaderbrot.MaxY".into(), format!("{:.17e}", b.max_y())),
            ("Shaderbrot.Iterations".into(), self.iterations.to_string()),
            ("Shaderbrot.Zoom".into(), format!("{:.6e}", self.zoom)),
        ]
    }
}

/// Write an RGBA buffer to `path` as PNG with the viewport in tEXt chunks.
///
/// Uses the `png` crate directly so custom keywords are readable by
/// exiftool and similar tools.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &SnapshotMetadata,
) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "Shaderbrot".to_string())?;
    for (key, value) in metadata.text_pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;

    debug!(
        "Exported PNG {}x{} to {}",
        buffer.width,
        buffer.height,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_metadata_chunks() {
        let buffer = RenderBuffer::new(4, 3);
        let mut state = ViewportState::default();
        state.zoom_in().unwrap();
        let meta = SnapshotMetadata::from_state(&state);

        let dir = std::env::temp_dir().join("shaderbrot_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("meta.png");
        export_png(&buffer, &path, &meta).expect("export should succeed");

        let decoder = png::Decoder::new(std::fs::File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let info = reader.info();
        assert_eq!((info.width, info.height), (4, 3));
        let texts: Vec<_> = info.uncompressed_latin1_text.iter().collect();
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Software" && t.text == "Shaderbrot"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Shaderbrot.Iterations" && t.text == "52"));
        assert!(texts.iter().any(|t| t.keyword == "Shaderbrot.MinX"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_to_missing_directory_is_io_error() {
        let buffer = RenderBuffer::new(2, 2);
        let meta = SnapshotMetadata::from_state(&ViewportState::default());
        let path = std::env::temp_dir()
            .join("shaderbrot_no_such_dir")
            .join("nested")
            .join("x.png");
        assert!(matches!(
            export_png(&buffer, &path, &meta),
            Err(crate::RenderError::Io(_))
        ));
    }
}
