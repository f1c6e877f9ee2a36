//! The element a view draws into

use std::cell::Cell;
use std::rc::Rc;

/// Size of the host surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// CSS pixels
    pub width: u32,
    pub height: u32,
    /// Device pixels per CSS pixel
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Reports the current size of the host element
pub trait ViewContainer {
    fn size(&self) -> SurfaceSize;
}

/// A container whose size the host sets, e.g. from window resize events
#[derive(Debug, Clone)]
pub struct SharedContainer {
    size: Rc<Cell<SurfaceSize>>,
}

impl SharedContainer {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
        }
    }

    pub fn set(&self, size: SurfaceSize) {
        self.size.set(size);
    }
}

impl ViewContainer for SharedContainer {
    fn size(&self) -> SurfaceSize {
        self.size.get()
    }
}
