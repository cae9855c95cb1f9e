//! Image/frame cache: per-shape decoded raster content and animation
//! playback scheduling.
//!
//! Content is keyed by shape id, never shared across ids with the same url
//! (simplicity over de-duplication, an accepted inefficiency). Decoding runs
//! on a worker thread per request; results come back over a shared completion
//! queue drained by [`ImageCache::poll`] on the engine thread. Animated
//! entries carry one scheduled advance at a time: scheduling replaces the
//! previous deadline, removing the entry cancels it permanently.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use sketchkit_core::error::ImageError;
use sketchkit_core::types::{thread_safe, ThreadSafeVec};

use crate::surface::Bitmap;

/// Frames with no declared delay advance at the conventional 100 ms.
const ZERO_DELAY_FALLBACK: Duration = Duration::from_millis(100);

/// Resolves a shape's `url` to raw encoded bytes.
///
/// Implementations must be callable from decode worker threads.
pub trait ImageLoader: Send + Sync + 'static {
    fn load(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// Loader that treats `url` as a filesystem path.
#[derive(Debug, Default)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        std::fs::read(url).map_err(|e| ImageError::SourceUnavailable {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Decoded frames plus their declared delays. Static images decode to a
/// single frame with no delay.
struct DecodedContent {
    frames: Vec<Bitmap>,
    delays: Vec<Duration>,
}

type DecodeResult = (u64, Result<DecodedContent, ImageError>);

/// Playback state of a decoded entry.
struct ReadyContent {
    frames: Vec<Bitmap>,
    delays: Vec<Duration>,
    current: usize,
    /// At most one outstanding advance per shape id; `None` for static
    /// content or an animation not yet scheduled.
    next_advance: Option<Instant>,
}

impl ReadyContent {
    fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    fn delay_of(&self, index: usize) -> Duration {
        self.delays
            .get(index)
            .copied()
            .filter(|d| !d.is_zero())
            .unwrap_or(ZERO_DELAY_FALLBACK)
    }
}

enum CacheEntry {
    /// Decode outstanding; at most one per shape id.
    Pending,
    /// Decode failed; the shape is skipped on every redraw, no retries.
    Failed,
    Ready(ReadyContent),
}

/// Per-shape store of decoded static or animated image content.
pub struct ImageCache {
    loader: Arc<dyn ImageLoader>,
    entries: HashMap<u64, CacheEntry>,
    completed: ThreadSafeVec<DecodeResult>,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl ImageCache {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
            completed: thread_safe(Vec::new()),
        }
    }

    /// Begins an asynchronous decode for the shape unless one already ran or
    /// is in flight. Safe to call on every draw of the shape.
    pub fn request(&mut self, id: u64, url: &str) {
        if self.entries.contains_key(&id) {
            return;
        }
        self.entries.insert(id, CacheEntry::Pending);

        let loader = Arc::clone(&self.loader);
        let completed = Arc::clone(&self.completed);
        let url = url.to_string();
        std::thread::spawn(move || {
            let result = loader.load(&url).and_then(|bytes| decode(&bytes, &url));
            completed.lock().push((id, result));
        });
    }

    /// Drains finished decodes into the cache. Returns the ids that acquired
    /// content this call, so the caller can dirty exactly those layers.
    pub fn poll(&mut self) -> Vec<u64> {
        let finished: Vec<DecodeResult> = std::mem::take(&mut *self.completed.lock());
        let mut ready = Vec::new();
        for (id, result) in finished {
            // The shape may have been removed while its decode was in
            // flight; the result is dropped, not re-parked.
            if !matches!(self.entries.get(&id), Some(CacheEntry::Pending)) {
                continue;
            }
            match result {
                Ok(content) => {
                    self.entries.insert(
                        id,
                        CacheEntry::Ready(ReadyContent {
                            frames: content.frames,
                            delays: content.delays,
                            current: 0,
                            next_advance: None,
                        }),
                    );
                    ready.push(id);
                }
                Err(err) => {
                    tracing::warn!(shape = id, error = %err, "image decode failed");
                    self.entries.insert(id, CacheEntry::Failed);
                }
            }
        }
        ready
    }

    /// The bitmap to blit for the shape's current frame, if decoded.
    pub fn current_bitmap(&self, id: u64) -> Option<&Bitmap> {
        match self.entries.get(&id) {
            Some(CacheEntry::Ready(content)) => content.frames.get(content.current),
            _ => None,
        }
    }

    /// Schedules the next frame advance for an animated entry that has none
    /// outstanding. Static entries and already-scheduled animations are left
    /// alone, so repeated draws never stack timers.
    pub fn ensure_scheduled(&mut self, id: u64, now: Instant) {
        if let Some(CacheEntry::Ready(content)) = self.entries.get_mut(&id) {
            if content.is_animated() && content.next_advance.is_none() {
                content.next_advance = Some(now + content.delay_of(content.current));
            }
        }
    }

    /// Advances every animated entry whose deadline has passed, rescheduling
    /// each from `now` by the new frame's delay. Returns the affected ids.
    pub fn advance_due(&mut self, now: Instant) -> Vec<u64> {
        let mut advanced = Vec::new();
        for (id, entry) in &mut self.entries {
            let CacheEntry::Ready(content) = entry else {
                continue;
            };
            let Some(deadline) = content.next_advance else {
                continue;
            };
            if deadline > now {
                continue;
            }
            content.current = (content.current + 1) % content.frames.len();
            content.next_advance = Some(now + content.delay_of(content.current));
            advanced.push(*id);
        }
        advanced
    }

    /// Current frame index of a decoded entry.
    pub fn frame_index(&self, id: u64) -> Option<usize> {
        match self.entries.get(&id) {
            Some(CacheEntry::Ready(content)) => Some(content.current),
            _ => None,
        }
    }

    /// True once the shape has an entry of any state (pending, failed, or
    /// ready).
    pub fn is_known(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn is_pending(&self, id: u64) -> bool {
        matches!(self.entries.get(&id), Some(CacheEntry::Pending))
    }

    pub fn is_failed(&self, id: u64) -> bool {
        matches!(self.entries.get(&id), Some(CacheEntry::Failed))
    }

    /// Releases the shape's content and cancels its pending advance. The
    /// cancellation point for the animation schedule: a removed id can never
    /// advance again.
    pub fn remove(&mut self, id: u64) {
        self.entries.remove(&id);
    }

    /// Releases every entry (engine teardown).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn with_stub_loader() -> Self {
        struct StubLoader;
        impl ImageLoader for StubLoader {
            fn load(&self, url: &str) -> Result<Vec<u8>, ImageError> {
                Err(ImageError::SourceUnavailable {
                    url: url.to_string(),
                    reason: "stub loader".to_string(),
                })
            }
        }
        Self::new(Arc::new(StubLoader))
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(Arc::new(FsImageLoader))
    }
}

/// Decodes encoded bytes into frames. GIF sources decode the full frame
/// sequence with per-frame delays; everything else decodes as a single
/// static frame.
fn decode(bytes: &[u8], url: &str) -> Result<DecodedContent, ImageError> {
    let format = image::guess_format(bytes).map_err(|e| ImageError::DecodeFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if format == image::ImageFormat::Gif {
        let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(|e| ImageError::DecodeFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let frames =
            decoder
                .into_frames()
                .collect_frames()
                .map_err(|e| ImageError::DecodeFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        if frames.is_empty() {
            return Err(ImageError::EmptyImage {
                url: url.to_string(),
            });
        }

        let mut bitmaps = Vec::with_capacity(frames.len());
        let mut delays = Vec::with_capacity(frames.len());
        for frame in frames {
            delays.push(Duration::from(frame.delay()));
            let buffer = frame.into_buffer();
            let bitmap = Bitmap::from_rgba_image(&buffer).ok_or_else(|| ImageError::EmptyImage {
                url: url.to_string(),
            })?;
            bitmaps.push(bitmap);
        }
        return Ok(DecodedContent {
            frames: bitmaps,
            delays,
        });
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ImageError::DecodeFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_rgba8();
    let bitmap = Bitmap::from_rgba_image(&decoded).ok_or_else(|| ImageError::EmptyImage {
        url: url.to_string(),
    })?;
    Ok(DecodedContent {
        frames: vec![bitmap],
        delays: Vec::new(),
    })
}
