//! Interactive compression session.
//!
//! A [`Session`] owns everything that changes while a user tunes one image:
//! the loaded [`SourceImage`], the quality dial, the debounce timer and the
//! single result slot.
//!
//! ```text
//! load(source) ──────────────► derive now ─┐
//! set_quality(q) ─► debounce ─► derive ────┤  spawn_blocking(compress)
//!                   (100 ms,                │
//!                    restarts)              ▼
//!                               latest request? ── no ──► Discarded
//!                                    │ yes
//!                           Ok ──────┴────── Err
//!                           ▼                 ▼
//!                 Updated (slot replaced,   Failed (slot untouched)
//!                  old buffer released)
//! ```
//!
//! Results arrive on the event channel returned by [`Session::new`]. Each
//! request carries a [`RequestId`]; a completion only takes effect when its id
//! is still the most recent one, so a slow early derivation can never
//! overwrite a faster later one.

mod debounce;
mod slot;

pub use debounce::Debouncer;
pub use slot::{Install, RequestId, ResultSlot};

use crate::config::Config;
use crate::imaging::{BackendError, ImageBackend, Quality, ResizeFilter, operations};
use crate::types::{CompressedImage, SourceImage};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;

/// Tunables for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Quiet window before a quality change is acted on.
    pub debounce: Duration,
    pub filter: ResizeFilter,
    /// Quality used for the first derivation after a load.
    pub initial_quality: Quality,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.session.debounce_ms),
            filter: config.compression.resize_filter,
            initial_quality: Quality::from_percent(config.compression.quality),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A new result is current.
    Updated {
        request: RequestId,
        source: Arc<SourceImage>,
        image: Arc<CompressedImage>,
    },
    /// The latest request failed; the previous result (if any) stays current.
    Failed {
        request: RequestId,
        error: BackendError,
    },
    /// A request finished after a newer one was issued.
    Discarded { request: RequestId },
}

impl SessionEvent {
    pub fn request(&self) -> RequestId {
        match self {
            Self::Updated { request, .. }
            | Self::Failed { request, .. }
            | Self::Discarded { request } => *request,
        }
    }
}

#[derive(Debug)]
struct State {
    source: Option<Arc<SourceImage>>,
    quality: Quality,
    slot: ResultSlot,
}

/// The part of a session that derivation tasks carry with them.
struct Worker<B> {
    backend: Arc<B>,
    state: Arc<Mutex<State>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    filter: ResizeFilter,
}

impl<B> Clone for Worker<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            filter: self.filter,
        }
    }
}

impl<B: ImageBackend + 'static> Worker<B> {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start deriving `source` at `quality` in the background.
    fn spawn(&self, source: Arc<SourceImage>, quality: Quality, request: RequestId) {
        let worker = self.clone();
        tokio::spawn(async move {
            let backend = Arc::clone(&worker.backend);
            let job_source = Arc::clone(&source);
            let filter = worker.filter;
            let outcome = tokio::task::spawn_blocking(move || {
                operations::compress(backend.as_ref(), &job_source, quality, filter)
            })
            .await
            .unwrap_or_else(|e| {
                Err(BackendError::Encode(format!(
                    "compression task failed: {}",
                    e
                )))
            });
            worker.finish(request, source, outcome);
        });
    }

    fn finish(
        &self,
        request: RequestId,
        source: Arc<SourceImage>,
        outcome: Result<CompressedImage, BackendError>,
    ) {
        let event = {
            let mut state = self.lock();
            match outcome {
                Ok(image) => {
                    let image = Arc::new(image);
                    match state.slot.install(request, Arc::clone(&image)) {
                        Install::Installed { released } => {
                            if let Some(old) = released {
                                log::debug!("released previous result ({} bytes)", old.size());
                            }
                            SessionEvent::Updated {
                                request,
                                source,
                                image,
                            }
                        }
                        Install::Stale => SessionEvent::Discarded { request },
                    }
                }
                Err(error) if state.slot.is_latest(request) => {
                    log::warn!("{} {} failed: {}", source.name(), request, error);
                    SessionEvent::Failed { request, error }
                }
                Err(_) => SessionEvent::Discarded { request },
            }
        };

        if let SessionEvent::Discarded { request } = &event {
            log::debug!("discarded stale result {}", request);
        }
        // Nobody listening is fine; the slot is the source of truth.
        let _ = self.events.send(event);
    }
}

/// Controller for one image being tuned. See the [module docs](self).
pub struct Session<B> {
    worker: Worker<B>,
    debouncer: Debouncer,
}

impl<B: ImageBackend + 'static> Session<B> {
    /// Create a session and the channel its results arrive on.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        backend: Arc<B>,
        options: SessionOptions,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let state = State {
            source: None,
            quality: options.initial_quality,
            slot: ResultSlot::new(),
        };
        let session = Self {
            worker: Worker {
                backend,
                state: Arc::new(Mutex::new(state)),
                events,
                filter: options.filter,
            },
            debouncer: Debouncer::new(options.debounce),
        };
        (session, rx)
    }

    /// Replace the source and derive immediately at the current quality.
    ///
    /// Any pending quality change is dropped and the previous source's result
    /// is released.
    pub fn load(&mut self, source: SourceImage) -> RequestId {
        self.debouncer.cancel();
        let source = Arc::new(source);
        let (quality, request) = {
            let mut state = self.worker.lock();
            state.source = Some(Arc::clone(&source));
            if let Some(old) = state.slot.clear() {
                log::debug!("released result of previous source ({} bytes)", old.size());
            }
            (state.quality, state.slot.issue())
        };

        log::info!("loaded {} ({}) at {}", source.name(), source.media_type(), quality);
        self.worker.spawn(source, quality, request);
        request
    }

    /// Record a new quality and schedule a derivation after the quiet window.
    ///
    /// Returns `None` when no source is loaded; the quality is still kept for
    /// the next [`load`](Self::load).
    pub fn set_quality(&mut self, quality: Quality) -> Option<RequestId> {
        let (source, request) = {
            let mut state = self.worker.lock();
            state.quality = quality;
            let source = state.source.clone()?;
            (source, state.slot.issue())
        };

        if self.debouncer.cancel() {
            log::trace!("quality change superseded a pending request");
        }
        let worker = self.worker.clone();
        self.debouncer
            .schedule(move || worker.spawn(source, quality, request));
        Some(request)
    }

    pub fn quality(&self) -> Quality {
        self.worker.lock().quality
    }

    pub fn source(&self) -> Option<Arc<SourceImage>> {
        self.worker.lock().source.clone()
    }

    /// The result currently on display.
    pub fn current(&self) -> Option<Arc<CompressedImage>> {
        self.worker.lock().slot.current()
    }

    /// The request whose completion will settle the session.
    pub fn latest_request(&self) -> Option<RequestId> {
        self.worker.lock().slot.latest()
    }

    /// Whether a quality change is still waiting out the quiet window.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
