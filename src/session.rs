//! Photo session lifecycle
//!
//! A session is the ordered sequence of stills captured during one run of
//! the booth. Photos are appended one at a time as the capture sequence
//! fires and the whole session is cleared when a new run starts. Display
//! order always equals capture order.

use tracing::debug;

use crate::raster::Frame;

/// An ordered collection of captured, encoded stills
#[derive(Debug, Clone, Default)]
pub struct PhotoSession {
    photos: Vec<Vec<u8>>,
    capacity: usize,
}

impl PhotoSession {
    /// Create an empty session bounded by the configured photo count
    pub fn new(capacity: usize) -> Self {
        Self {
            photos: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a captured still; photos are immutable once captured
    pub fn push(&mut self, encoded: Vec<u8>) {
        debug!("captured photo {}/{}", self.photos.len() + 1, self.capacity);
        self.photos.push(encoded);
    }

    /// Drop all captured photos, ready for a fresh run
    pub fn clear(&mut self) {
        debug!("clearing session of {} photo(s)", self.photos.len());
        self.photos.clear();
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Whether the session has reached its configured photo count
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.photos.len() >= self.capacity
    }

    /// Captured photos in capture order
    pub fn photos(&self) -> &[Vec<u8>] {
        &self.photos
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<u8>> {
        self.photos.iter()
    }
}

/// Prepare a grabbed video frame for storage: center-crop to 4:3
///
/// Mirroring is a preview-only affordance and is deliberately NOT applied
/// here; stored pixels always keep the camera's orientation.
pub fn capture_still(frame: &Frame) -> Frame {
    frame.crop_to_aspect(4, 3)
}

/// Prepare a frame for the live preview, optionally mirrored
pub fn preview_frame(frame: &Frame, mirror: bool) -> Frame {
    if mirror {
        frame.flip_horizontal()
    } else {
        frame.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut session = PhotoSession::new(2);
        assert!(session.is_empty());
        assert!(!session.is_full());

        session.push(vec![1]);
        session.push(vec![2]);
        assert_eq!(session.len(), 2);
        assert!(session.is_full());

        // order is positional and meaningful
        assert_eq!(session.photos()[0], vec![1]);
        assert_eq!(session.photos()[1], vec![2]);

        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_capture_still_crops_to_four_three() {
        let frame = Frame::new_filled(1280, 720, [9, 9, 9, 255]);
        let still = capture_still(&frame);
        assert_eq!((still.width(), still.height()), (960, 720));
    }

    #[test]
    fn test_preview_mirror_does_not_touch_capture() {
        let mut frame = Frame::new_clear(2, 1);
        frame.set_pixel(0, 0, [255, 0, 0, 255]);

        let mirrored = preview_frame(&frame, true);
        assert_eq!(mirrored.get_pixel(1, 0), [255, 0, 0, 255]);

        let stored = capture_still(&frame);
        assert_eq!(stored.get_pixel(0, 0), [255, 0, 0, 255]);
    }
}
