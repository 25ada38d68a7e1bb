//! Direct-display preview: scans are shown in a window without an
//! intermediate file.
//!
//! The window owns the main thread; [`DisplaySink`] is handed to the watcher
//! thread and forwards images over a channel. Only the newest image is kept.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use eframe::egui;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::{ImageEncoder, RgbImageData};
use crate::preview::sink::PreviewSink;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sending half: hands decoded scans to the preview window.
pub struct DisplaySink {
    tx: Sender<RgbImageData>,
}

impl PreviewSink for DisplaySink {
    fn present(&self, image: &RgbImageData, _encoder: &dyn ImageEncoder) -> Result<()> {
        self.tx
            .send(image.clone())
            .map_err(|_| ConversionError::DisplayClosed)?;
        debug!(width = image.width, height = image.height, "Preview sent to display");
        Ok(())
    }
}

/// Receiving half: an egui window showing the latest scan.
pub struct PreviewWindow {
    rx: Receiver<RgbImageData>,
    stop: Arc<AtomicBool>,
    texture: Option<egui::TextureHandle>,
}

/// Creates a connected sink and window. The window closes itself once `stop`
/// is set.
pub fn channel(stop: Arc<AtomicBool>) -> (DisplaySink, PreviewWindow) {
    let (tx, rx) = mpsc::channel();
    (
        DisplaySink { tx },
        PreviewWindow {
            rx,
            stop,
            texture: None,
        },
    )
}

impl PreviewWindow {
    /// Runs the window on the current thread until it is closed.
    pub fn run(self, title: &str) -> std::result::Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_title(title),
            ..Default::default()
        };

        eframe::run_native(title, options, Box::new(|_cc| Ok(Box::new(self))))
    }

    fn take_latest(&self) -> Option<RgbImageData> {
        self.rx.try_iter().last()
    }
}

impl eframe::App for PreviewWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.stop.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        if let Some(image) = self.take_latest() {
            let color_image = egui::ColorImage::from_rgb([image.width, image.height], &image.data);
            match &mut self.texture {
                Some(texture) => texture.set(color_image, Default::default()),
                None => {
                    self.texture = Some(ctx.load_texture("preview", color_image, Default::default()));
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| match &self.texture {
            Some(texture) => {
                let size = texture.size_vec2();
                let available = ui.available_size();
                let scale = (available.x / size.x).min(available.y / size.y).min(1.0);
                ui.add(egui::Image::new((texture.id(), size * scale)));
            }
            None => {
                ui.centered_and_justified(|ui| ui.label("Waiting for scans..."));
            }
        });

        ctx.request_repaint_after(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::{ConversionConfig, RawToTiffPipeline};

    #[test]
    fn test_window_keeps_only_latest_image() {
        let (sink, window) = channel(Arc::new(AtomicBool::new(false)));
        let pipeline = RawToTiffPipeline::new(ConversionConfig::default());

        for value in [1u8, 2, 3] {
            let image = RgbImageData::from_interleaved(1, 1, &[value; 3]).unwrap();
            sink.present(&image, &pipeline).unwrap();
        }

        let latest = window.take_latest().unwrap();
        assert_eq!(latest.pixel(0, 0), Some([3, 3, 3]));
        assert!(window.take_latest().is_none());
    }

    #[test]
    fn test_closed_window_is_reported() {
        let (sink, window) = channel(Arc::new(AtomicBool::new(false)));
        drop(window);
        let pipeline = RawToTiffPipeline::new(ConversionConfig::default());
        let image = RgbImageData::from_interleaved(1, 1, &[0; 3]).unwrap();

        assert!(matches!(
            sink.present(&image, &pipeline),
            Err(ConversionError::DisplayClosed)
        ));
    }
}
