use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info};

use shaderbrot_core::ViewportState;
use shaderbrot_render::{
    export_png, ShaderBackend, SnapshotMetadata, SoftwareBackend, ViewportUniforms,
};

/// Render `state` at `width`×`height` on the CPU and write it under `dir`.
pub(crate) struct SnapshotRequest {
    pub(crate) state: ViewportState,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) dir: PathBuf,
}

pub(crate) enum SnapshotResponse {
    Saved(PathBuf),
    Failed(String),
}

/// Spawn the snapshot worker thread.
///
/// Returns the send-side for requests and the receive-side for responses.
/// The thread runs until the request sender is dropped.
pub(crate) fn spawn_snapshot_worker(
) -> std::io::Result<(mpsc::Sender<SnapshotRequest>, mpsc::Receiver<SnapshotResponse>)> {
    let (req_tx, req_rx) = mpsc::channel::<SnapshotRequest>();
    let (resp_tx, resp_rx) = mpsc::channel::<SnapshotResponse>();

    std::thread::Builder::new()
        .name("snapshot-worker".into())
        .spawn(move || {
            debug!("Snapshot worker thread started");
            while let Ok(request) = req_rx.recv() {
                let response = match write_snapshot(&request) {
                    Ok(path) => {
                        info!("Saved snapshot to {}", path.display());
                        SnapshotResponse::Saved(path)
                    }
                    Err(e) => {
                        error!("Snapshot failed: {e}");
                        SnapshotResponse::Failed(e.to_string())
                    }
                };
                if resp_tx.send(response).is_err() {
                    break;
                }
            }
            debug!("Snapshot worker thread exiting");
        })?;

    Ok((req_tx, resp_rx))
}

pub(crate) fn write_snapshot(request: &SnapshotRequest) -> shaderbrot_render::Result<PathBuf> {
    let mut backend = SoftwareBackend::new(request.width, request.height)?;
    backend.set_viewport_uniforms(&ViewportUniforms::from_state(&request.state))?;
    backend.draw()?;

    std::fs::create_dir_all(&request.dir)?;
    let path = request.dir.join(snapshot_file_name());
    export_png(
        backend.buffer(),
        &path,
        &SnapshotMetadata::from_state(&request.state),
    )?;
    Ok(path)
}

/// Physical pixel size of a canvas measured in egui points.
pub(crate) fn snapshot_pixel_size(canvas_points: [u32; 2], pixels_per_point: f32) -> [u32; 2] {
    let scale = if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
        pixels_per_point
    } else {
        1.0
    };
    canvas_points.map(|p| ((p as f32 * scale).round() as u32).max(1))
}

fn snapshot_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("shaderbrot_{millis}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_into_requested_directory() {
        let dir = std::env::temp_dir().join("shaderbrot_test_snapshot_worker");
        let request = SnapshotRequest {
            state: ViewportState::default(),
            width: 40,
            height: 30,
            dir: dir.clone(),
        };
        let path = write_snapshot(&request).expect("snapshot should be written");
        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn snapshot_size_follows_display_scale() {
        assert_eq!(snapshot_pixel_size([800, 600], 1.0), [800, 600]);
        assert_eq!(snapshot_pixel_size([800, 600], 2.0), [1600, 1200]);
        assert_eq!(snapshot_pixel_size([801, 3], 1.5), [1202, 5]);
        assert_eq!(snapshot_pixel_size([800, 600], 0.0), [800, 600]);
    }

    #[test]
    fn worker_replies_per_request() {
        let dir = std::env::temp_dir().join("shaderbrot_test_snapshot_thread");
        let (tx, rx) = spawn_snapshot_worker().unwrap();
        tx.send(SnapshotRequest {
            state: ViewportState::default(),
            width: 16,
            height: 16,
            dir: dir.clone(),
        })
        .unwrap();
        match rx.recv().unwrap() {
            SnapshotResponse::Saved(path) => assert!(path.exists()),
            SnapshotResponse::Failed(e) => panic!("snapshot failed: {e}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
