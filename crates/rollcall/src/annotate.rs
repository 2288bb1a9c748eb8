//! Boxes and labels drawn over the original photo.

use crate::error::{Error, Result};
use crate::imaging;
use crate::workflow::ClassifiedFace;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect as PixelRect;
use rollcall_core::{DetectedFace, Rect};
use std::path::Path;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const LINE_WIDTH: i32 = 4;
/// Gap between the bottom edge of a box and its label.
const LABEL_GAP: i32 = 4;

pub struct Annotator {
    font: Option<FontVec>,
    scale: PxScale,
}

impl Annotator {
    /// Without a font only boxes are drawn.
    pub fn new(font: Option<FontVec>, font_size: f32) -> Self {
        if font.is_none() {
            tracing::warn!("no label font; annotations will have boxes only");
        }
        Self {
            font,
            scale: PxScale::from(font_size),
        }
    }

    pub fn from_font_file(path: &Path, font_size: f32) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        Ok(Self::new(Some(font), font_size))
    }

    /// The original image at `path` with a labeled box per classified face.
    pub fn draw_faces(&self, path: &Path, faces: &[ClassifiedFace]) -> Result<RgbImage> {
        let mut canvas = imaging::load_image(path)?.to_rgb8();
        for face in faces {
            self.mark(&mut canvas, &face.rect, Some(&face.label));
        }
        Ok(canvas)
    }

    /// The original image at `path` with an unlabeled box per detected face.
    pub fn draw_detections(&self, path: &Path, faces: &[DetectedFace]) -> Result<RgbImage> {
        let mut canvas = imaging::load_image(path)?.to_rgb8();
        for face in faces {
            self.mark(&mut canvas, &face.rect, None);
        }
        Ok(canvas)
    }

    fn mark(&self, canvas: &mut RgbImage, rect: &Rect, label: Option<&str>) {
        draw_thick_rect(canvas, rect);

        if let (Some(font), Some(text)) = (&self.font, label) {
            draw_text_mut(
                canvas,
                BOX_COLOR,
                rect.x,
                rect.bottom() + LABEL_GAP,
                self.scale,
                font,
                text,
            );
        }
    }
}

/// Stroke centred on the rectangle's edge, `LINE_WIDTH` pixels wide.
fn draw_thick_rect(canvas: &mut RgbImage, rect: &Rect) {
    let half = LINE_WIDTH / 2;
    for i in 0..LINE_WIDTH {
        let grow = half - i;
        let w = rect.width as i32 + 2 * grow;
        let h = rect.height as i32 + 2 * grow;
        if w <= 0 || h <= 0 {
            continue;
        }
        let ring = PixelRect::at(rect.x - grow, rect.y - grow).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, ring, BOX_COLOR);
    }
}
