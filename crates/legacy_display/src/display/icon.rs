//! Window icon conversion and ownership
//!
//! Client pixel buffers are validated and packed into an [`IconSet`]. The
//! [`IconTracker`] owns at most one pending set (requested before a window
//! exists) and one active set (applied to the live window). A superseded set
//! is released exactly once, and never when it is the set being activated.

use std::cell::{Cell, Ref, RefCell};
use std::path::Path;
use std::rc::Rc;

use log::{debug, warn};
use thiserror::Error;

use crate::backend::{WindowId, WindowSystem};

const BYTES_PER_PIXEL: usize = 4;

/// Icon conversion errors
#[derive(Error, Debug)]
pub enum IconError {
    /// A buffer carried no pixel data
    #[error("Icon buffer {index} is empty")]
    EmptyBuffer {
        /// Position of the buffer in the request
        index: usize,
    },

    /// A buffer's length is not a whole number of RGBA pixels
    #[error("Icon buffer {index} has {len} bytes, not a multiple of 4")]
    Misaligned {
        /// Position of the buffer in the request
        index: usize,
        /// Byte length
        len: usize,
    },

    /// A buffer's pixel count is not a perfect square
    #[error("Icon buffer {index} has {pixels} pixels; only square icons are supported")]
    NotSquare {
        /// Position of the buffer in the request
        index: usize,
        /// Pixel count
        pixels: usize,
    },

    /// An icon file could not be decoded
    #[error("Icon decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// One square RGBA8 icon image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

impl IconImage {
    /// Validate one raw RGBA8 buffer
    pub fn from_rgba(index: usize, buffer: &[u8]) -> Result<Self, IconError> {
        if buffer.is_empty() {
            return Err(IconError::EmptyBuffer { index });
        }
        if buffer.len() % BYTES_PER_PIXEL != 0 {
            return Err(IconError::Misaligned { index, len: buffer.len() });
        }
        let pixels = buffer.len() / BYTES_PER_PIXEL;
        let side = integer_sqrt(pixels);
        if side * side != pixels {
            return Err(IconError::NotSquare { index, pixels });
        }
        let side = u32::try_from(side).map_err(|_| IconError::NotSquare { index, pixels })?;
        Ok(Self {
            width: side,
            height: side,
            pixels: buffer.to_vec(),
        })
    }

    /// Pixels packed as `0xAABBGGRR` words, the layout GLFW expects
    pub fn packed_pixels(&self) -> Vec<u32> {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|p| u32::from_le_bytes([p[0], p[1], p[2], p[3]]))
            .collect()
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut side = (n as f64).sqrt() as usize;
    while side * side > n {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= n {
        side += 1;
    }
    side
}

/// A packed array of icon images with an explicit release flag
///
/// Once freed, [`IconSet::images`] returns `None` instead of stale data.
#[derive(Debug)]
pub struct IconSet {
    images: RefCell<Vec<IconImage>>,
    freed: Cell<bool>,
}

impl IconSet {
    /// Validate and pack raw RGBA8 buffers, typically 16x16 and 32x32
    pub fn from_rgba(buffers: &[&[u8]]) -> Result<Self, IconError> {
        let images = buffers
            .iter()
            .enumerate()
            .map(|(index, buffer)| IconImage::from_rgba(index, buffer))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_images(images))
    }

    /// Decode image files into an icon set
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, IconError> {
        let mut images = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let rgba = image::open(path.as_ref())?.to_rgba8();
            images.push(IconImage::from_rgba(index, rgba.as_raw())?);
        }
        Ok(Self::from_images(images))
    }

    /// The built-in 32x32 and 16x16 icons used when the client sets none
    pub fn default_icons() -> Self {
        Self::from_images(vec![default_icon_image(32), default_icon_image(16)])
    }

    fn from_images(images: Vec<IconImage>) -> Self {
        Self {
            images: RefCell::new(images),
            freed: Cell::new(false),
        }
    }

    /// The packed images, or `None` once freed
    pub fn images(&self) -> Option<Ref<'_, [IconImage]>> {
        if self.freed.get() {
            None
        } else {
            Some(Ref::map(self.images.borrow(), Vec::as_slice))
        }
    }

    /// Number of images still held
    pub fn len(&self) -> usize {
        self.images.borrow().len()
    }

    /// Whether no images are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the set has been released
    pub fn is_freed(&self) -> bool {
        self.freed.get()
    }

    /// Release the pixel data; further calls do nothing
    pub fn free(&self) {
        if !self.freed.replace(true) {
            self.images.borrow_mut().clear();
        }
    }
}

fn default_icon_image(side: u32) -> IconImage {
    let edge = side.saturating_sub(1);
    let img = image::RgbaImage::from_fn(side, side, |x, y| {
        if x == 0 || y == 0 || x == edge || y == edge {
            image::Rgba([0x20, 0x20, 0x30, 0xff])
        } else {
            let shade = u8::try_from(0x60 + (x + y) * 0x9f / (2 * side)).unwrap_or(u8::MAX);
            image::Rgba([shade, shade / 2, 0xe0, 0xff])
        }
    });
    IconImage {
        width: side,
        height: side,
        pixels: img.into_raw(),
    }
}

/// Tracks the pending and active icon sets of the display
#[derive(Debug, Default)]
pub struct IconTracker {
    pending: Option<Rc<IconSet>>,
    active: Option<Rc<IconSet>>,
}

impl IconTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a set to apply when the next window is created
    pub fn cache(&mut self, set: Rc<IconSet>) {
        if let Some(previous) = self.pending.replace(set) {
            self.release_if_unused(&previous);
        }
    }

    /// Remove and return the pending set
    pub fn take_pending(&mut self) -> Option<Rc<IconSet>> {
        self.pending.take()
    }

    /// The set currently applied to the window
    pub fn active(&self) -> Option<&Rc<IconSet>> {
        self.active.as_ref()
    }

    /// Whether a set is waiting for a window
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a set to a live window and make it the active one
    ///
    /// The previously active set is freed unless it is `set` itself. A native
    /// failure is reported as a warning and leaves the active set unchanged.
    pub fn activate<W: WindowSystem>(&mut self, system: &mut W, window: WindowId, set: Rc<IconSet>) -> bool {
        let applied = match set.images() {
            Some(images) => system.set_icon(window, &images),
            None => {
                debug!("Skipping freed icon set");
                return false;
            }
        };
        if let Err(e) = applied {
            warn!("Couldn't set window icon: {e}");
            return false;
        }

        if let Some(previous) = self.active.replace(set) {
            self.release_if_unused(&previous);
        }
        true
    }

    fn release_if_unused(&self, previous: &Rc<IconSet>) {
        let still_active = self.active.as_ref().is_some_and(|a| Rc::ptr_eq(a, previous));
        let still_pending = self.pending.as_ref().is_some_and(|p| Rc::ptr_eq(p, previous));
        if !still_active && !still_pending && !previous.is_freed() {
            previous.free();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HeadlessWindowSystem, MonitorBinding, WindowRequest};

    fn square(side: usize) -> Vec<u8> {
        vec![0xff; side * side * BYTES_PER_PIXEL]
    }

    fn window(system: &mut HeadlessWindowSystem) -> WindowId {
        system
            .create_window(&WindowRequest {
                width: 100,
                height: 100,
                title: "icons".to_string(),
                monitor: MonitorBinding::Windowed,
                share_with: None,
            })
            .unwrap()
    }

    #[test]
    fn test_square_buffers_accepted() {
        let small = square(16);
        let large = square(32);
        let set = IconSet::from_rgba(&[&small, &large]).unwrap();
        let images = set.images().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!((images[0].width, images[0].height), (16, 16));
        assert_eq!((images[1].width, images[1].height), (32, 32));
    }

    #[test]
    fn test_non_square_and_empty_buffers_rejected() {
        let wide = vec![0u8; 3 * BYTES_PER_PIXEL];
        assert!(matches!(
            IconSet::from_rgba(&[&wide]),
            Err(IconError::NotSquare { index: 0, pixels: 3 })
        ));
        let ok = square(4);
        assert!(matches!(
            IconSet::from_rgba(&[&ok, &[]]),
            Err(IconError::EmptyBuffer { index: 1 })
        ));
        assert!(matches!(
            IconSet::from_rgba(&[&[1, 2, 3]]),
            Err(IconError::Misaligned { index: 0, len: 3 })
        ));
    }

    #[test]
    fn test_free_is_idempotent() {
        let set = IconSet::default_icons();
        assert!(set.images().is_some());
        set.free();
        assert!(set.is_freed());
        assert!(set.images().is_none());
        set.free();
        assert!(set.is_freed());
        assert!(set.images().is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_packed_pixels_little_endian() {
        let image = IconImage::from_rgba(0, &[0x11, 0x22, 0x33, 0x44]).unwrap();
        assert_eq!(image.packed_pixels(), vec![0x4433_2211]);
    }

    #[test]
    fn test_superseded_set_freed_once() {
        let mut system = HeadlessWindowSystem::new();
        let id = window(&mut system);
        let mut tracker = IconTracker::new();

        let first = Rc::new(IconSet::default_icons());
        let second = Rc::new(IconSet::default_icons());
        assert!(tracker.activate(&mut system, id, Rc::clone(&first)));
        assert!(tracker.activate(&mut system, id, Rc::clone(&second)));

        assert!(first.is_freed());
        assert!(!second.is_freed());
        assert_eq!(system.icon_count(id), 2);
    }

    #[test]
    fn test_reactivating_same_set_does_not_free_it() {
        let mut system = HeadlessWindowSystem::new();
        let id = window(&mut system);
        let mut tracker = IconTracker::new();

        let set = Rc::new(IconSet::default_icons());
        tracker.activate(&mut system, id, Rc::clone(&set));
        tracker.activate(&mut system, id, Rc::clone(&set));
        assert!(!set.is_freed());
        assert!(Rc::ptr_eq(tracker.active().unwrap(), &set));
    }

    #[test]
    fn test_pending_replacement_frees_old_pending() {
        let mut tracker = IconTracker::new();
        let first = Rc::new(IconSet::default_icons());
        tracker.cache(Rc::clone(&first));
        tracker.cache(Rc::new(IconSet::default_icons()));
        assert!(first.is_freed());
        assert!(tracker.has_pending());
    }

    #[test]
    fn test_failed_application_keeps_previous_active() {
        let mut system = HeadlessWindowSystem::new();
        let id = window(&mut system);
        let mut tracker = IconTracker::new();

        let first = Rc::new(IconSet::default_icons());
        tracker.activate(&mut system, id, Rc::clone(&first));
        system.fail_icons(true);
        assert!(!tracker.activate(&mut system, id, Rc::new(IconSet::default_icons())));
        assert!(!first.is_freed());
        assert!(Rc::ptr_eq(tracker.active().unwrap(), &first));
    }
}
