//! Export and share plumbing
//!
//! Saving and sharing both follow the same shape: an ordered ladder of
//! strategies, tried in sequence, where the first success wins and
//! exhaustion surfaces a user-facing notice instead of a crash. The ladder
//! itself is a small generic abstraction; the concrete rungs are the
//! composite file, the first-photo fallback, and the share targets.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::error::{ExportError, Result};

/// Title attached to shared artifacts
pub const SHARE_TITLE: &str = "My Snapshot Photobooth Photo";

/// Body text attached to shared artifacts
pub const SHARE_TEXT: &str = "Check out my photos from Snapshot Photobooth!";

/// Filename for the full composite artifact
pub fn composite_filename() -> String {
    format!("snapshot-photobooth-{}.jpg", Local::now().timestamp_millis())
}

/// Filename for the single-photo fallback
pub fn photo_filename() -> String {
    format!("snapshot-photo-{}.jpg", Local::now().timestamp_millis())
}

/// An ordered list of export strategies
///
/// Strategies run in push order; the first `Ok` short-circuits the chain.
/// Failures are logged and the next rung is tried. An exhausted chain
/// returns [`ExportError::AllStrategiesFailed`].
pub struct FallbackChain<'a, T> {
    strategies: Vec<(&'static str, Box<dyn FnOnce() -> Result<T> + 'a>)>,
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Add a strategy rung to the end of the ladder
    pub fn then<F>(mut self, name: &'static str, strategy: F) -> Self
    where
        F: FnOnce() -> Result<T> + 'a,
    {
        self.strategies.push((name, Box::new(strategy)));
        self
    }

    /// Run the ladder to the first success
    pub fn run(self) -> Result<T> {
        let attempts = self.strategies.len();
        for (name, strategy) in self.strategies {
            match strategy() {
                Ok(value) => {
                    info!("export strategy succeeded: {}", name);
                    return Ok(value);
                }
                Err(e) => {
                    warn!("export strategy failed: {}: {}", name, e);
                }
            }
        }
        Err(ExportError::AllStrategiesFailed { attempts }.into())
    }
}

impl<'a, T> Default for FallbackChain<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// What the save ladder ended up writing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedArtifact {
    Composite(PathBuf),
    SinglePhoto(PathBuf),
}

impl SavedArtifact {
    pub fn path(&self) -> &Path {
        match self {
            SavedArtifact::Composite(path) | SavedArtifact::SinglePhoto(path) => path,
        }
    }
}

/// Save the session to disk, degrading from the composite to the first
/// photo
///
/// `composite` is the already-composed artifact when composition succeeded;
/// passing `None` (composition failed upstream) skips straight to the
/// single-photo rung, mirroring the capture app's save behavior.
pub fn save_with_fallback(
    dir: &Path,
    composite: Option<&[u8]>,
    photos: &[Vec<u8>],
) -> Result<SavedArtifact> {
    FallbackChain::new()
        .then("save composite strip", || {
            let bytes = composite.ok_or(ExportError::ShareUnavailable {
                target: "composite".to_string(),
            })?;
            let path = dir.join(composite_filename());
            std::fs::write(&path, bytes).map_err(|_| ExportError::WriteFailed {
                path: path.display().to_string(),
            })?;
            Ok(SavedArtifact::Composite(path))
        })
        .then("save first photo", || {
            let bytes = photos.first().ok_or(ExportError::ShareUnavailable {
                target: "photos".to_string(),
            })?;
            let path = dir.join(photo_filename());
            std::fs::write(&path, bytes).map_err(|_| ExportError::WriteFailed {
                path: path.display().to_string(),
            })?;
            Ok(SavedArtifact::SinglePhoto(path))
        })
        .run()
}

/// Platform share boundary
///
/// The actual share facility lives outside this crate; implementors adapt
/// whatever the host platform offers. A target that cannot share at all
/// returns errors from both methods and the ladder falls through to the
/// user notice.
pub trait ShareTarget: Send + Sync {
    fn name(&self) -> &str;

    /// Share an encoded photo as a file attachment
    fn share_file(&self, file_name: &str, bytes: &[u8], title: &str, text: &str) -> Result<()>;

    /// Share a plain URL
    fn share_url(&self, url: &str, title: &str, text: &str) -> Result<()>;
}

/// Share the first photo through the target's ladder: file, then URL
pub fn share_photos(target: &dyn ShareTarget, photos: &[Vec<u8>], url: &str) -> Result<()> {
    FallbackChain::new()
        .then("share photo file", || {
            let bytes = photos.first().ok_or(ExportError::ShareUnavailable {
                target: target.name().to_string(),
            })?;
            target.share_file(&photo_filename(), bytes, SHARE_TITLE, SHARE_TEXT)
        })
        .then("share url", || target.share_url(url, SHARE_TITLE, SHARE_TEXT))
        .run()
}
