use crate::foundation::core::{Canvas, Surface};
use crate::foundation::error::MoodResult;
use crate::render::compositor::LayerThumbnails;
use crate::text::engine::TextOverlay;

/// Host-owned drawing surface. The host decides its size; frames are rendered to match.
pub trait SurfaceTarget {
    fn size(&self) -> Canvas;

    fn present(&mut self, frame: &Surface) -> MoodResult<()>;

    fn present_thumbnails(&mut self, _thumbnails: &LayerThumbnails) -> MoodResult<()> {
        Ok(())
    }
}

/// Host-owned text element.
pub trait TextTarget {
    fn apply(&mut self, overlay: &TextOverlay) -> MoodResult<()>;
}

/// Keeps the last presented frame in memory (headless hosts, tests, the CLI).
#[derive(Clone, Debug)]
pub struct MemorySurface {
    canvas: Canvas,
    frame: Option<Surface>,
    thumbnails: Option<LayerThumbnails>,
    presented: u64,
}

impl MemorySurface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            frame: None,
            thumbnails: None,
            presented: 0,
        }
    }

    /// Host-side resize; the next frame renders at the new size.
    pub fn set_size(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    pub fn frame(&self) -> Option<&Surface> {
        self.frame.as_ref()
    }

    pub fn thumbnails(&self) -> Option<&LayerThumbnails> {
        self.thumbnails.as_ref()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl SurfaceTarget for MemorySurface {
    fn size(&self) -> Canvas {
        self.canvas
    }

    fn present(&mut self, frame: &Surface) -> MoodResult<()> {
        match &mut self.frame {
            Some(existing) if existing.canvas() == frame.canvas() => {
                existing.data_mut().copy_from_slice(frame.data());
            }
            slot => *slot = Some(frame.clone()),
        }
        self.presented += 1;
        Ok(())
    }

    fn present_thumbnails(&mut self, thumbnails: &LayerThumbnails) -> MoodResult<()> {
        self.thumbnails = Some(thumbnails.clone());
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryText {
    overlay: Option<TextOverlay>,
    applied: u64,
}

impl MemoryText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Option<&TextOverlay> {
        self.overlay.as_ref()
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }
}

impl TextTarget for MemoryText {
    fn apply(&mut self, overlay: &TextOverlay) -> MoodResult<()> {
        self.overlay = Some(overlay.clone());
        self.applied += 1;
        Ok(())
    }
}
