//! Polling sync controller
//!
//! Long-lived client-side controller that refreshes the gallery from the
//! remote folder on a fixed interval. Observers watch a [`SyncState`]
//! channel; the controller owns the polling task, the teardown token, and
//! the generation counter that fences off responses arriving after
//! teardown.
//!
//! Failed refreshes keep the last good photo set on screen. Only a
//! successful sync ever replaces it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use core_runtime::config::{GalleryConfig, ModeTag};
use core_sync::{SyncFailure, SyncRequest, SyncResponse, SyncService};

use crate::records::{records_from_response, PhotoRecord};

/// Message shown when the account needs a second factor
pub const MFA_REQUIRED_MESSAGE: &str = "Multi-Factor Authentication Required";

/// Message shown when the gateway rejects the stored credentials
pub const CONNECTION_FAILED_MESSAGE: &str =
    "MEGA connection failed - please check credentials and try again";

/// Backend seam so the controller can be driven without a live gateway
#[async_trait]
pub trait SyncBackend: Send + Sync {
    async fn sync(&self, request: &SyncRequest) -> Result<SyncResponse, SyncFailure>;
}

#[async_trait]
impl SyncBackend for SyncService {
    async fn sync(&self, request: &SyncRequest) -> Result<SyncResponse, SyncFailure> {
        SyncService::sync(self, request).await
    }
}

/// Lifecycle phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No access mode resolved; the controller never polls
    Idle,
    /// A refresh is in flight
    Loading,
    /// The last refresh replaced the photo set
    Success,
    /// The last refresh failed; the previous photo set is retained
    Error,
    /// The account needs a second factor before any sync can succeed
    MfaRequired,
}

/// Observable controller state
#[derive(Debug, Clone)]
pub struct SyncState {
    pub phase: SyncPhase,

    /// Last successfully synced photo set. Survives failed refreshes.
    pub photos: Vec<PhotoRecord>,

    /// User-facing message for the last failure, if any
    pub error: Option<String>,

    /// The access mode this session resolved to, if any
    pub mode: Option<ModeTag>,
}

impl SyncState {
    fn idle(mode: Option<ModeTag>) -> Self {
        Self {
            phase: SyncPhase::Idle,
            photos: Vec::new(),
            error: None,
            mode,
        }
    }
}

/// Polling controller for one gallery session.
///
/// Construction resolves the access mode exactly once; a session whose
/// configuration resolves to neither mode stays [`SyncPhase::Idle`] forever
/// and issues no requests.
pub struct PhotoSyncController<B: SyncBackend> {
    backend: Arc<B>,
    request: Option<SyncRequest>,
    refresh_interval: Duration,
    state: watch::Sender<SyncState>,
    generation: AtomicU64,
    shutdown_token: CancellationToken,
}

impl<B: SyncBackend + 'static> PhotoSyncController<B> {
    pub fn new(backend: Arc<B>, config: &GalleryConfig) -> Self {
        let request = SyncRequest::from_config(config);
        let mode = request.as_ref().map(|r| r.mode.tag());

        if request.is_none() {
            info!("No access mode configured; controller stays idle");
        }

        let (state, _) = watch::channel(SyncState::idle(mode));

        Self {
            backend,
            request,
            refresh_interval: config.refresh_interval,
            state,
            generation: AtomicU64::new(0),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Subscribe to state updates
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// Start the polling loop.
    ///
    /// The first refresh runs immediately; subsequent refreshes follow the
    /// configured interval. Returns `None` when no access mode resolved.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        self.request.as_ref()?;

        let controller = Arc::clone(self);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(controller.refresh_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = controller.shutdown_token.cancelled() => {
                        debug!("Polling loop stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        controller.refresh().await;
                    }
                }
            }
        }))
    }

    /// Run one refresh cycle now.
    ///
    /// Responses that complete after [`PhotoSyncController::shutdown`] are
    /// discarded; the generation fence also covers shutdowns that race the
    /// in-flight request.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let Some(request) = &self.request else {
            return;
        };

        let generation = self.generation.load(Ordering::Acquire);
        self.state.send_modify(|s| {
            s.phase = SyncPhase::Loading;
        });

        let result = self.backend.sync(request).await;

        if self.shutdown_token.is_cancelled()
            || self.generation.load(Ordering::Acquire) != generation
        {
            debug!("Discarding sync response from a torn-down session");
            return;
        }

        match result {
            Ok(response) => {
                let photos = records_from_response(&response);
                info!("Refresh succeeded with {} photos", photos.len());
                self.state.send_modify(|s| {
                    s.phase = SyncPhase::Success;
                    s.photos = photos;
                    s.error = None;
                });
            }
            Err(failure) => {
                let (phase, message) = classify_failure(&failure);
                warn!("Refresh failed: {}", failure);
                // Previous photos stay on screen
                self.state.send_modify(|s| {
                    s.phase = phase;
                    s.error = Some(message);
                });
            }
        }
    }

    /// Tear the session down.
    ///
    /// Stops the polling loop and fences off any response still in flight.
    /// Idempotent.
    pub fn shutdown(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.shutdown_token.cancel();
    }
}

impl<B: SyncBackend> Drop for PhotoSyncController<B> {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

fn classify_failure(failure: &SyncFailure) -> (SyncPhase, String) {
    if failure.requires_mfa() {
        (SyncPhase::MfaRequired, MFA_REQUIRED_MESSAGE.to_string())
    } else if failure.kind == core_sync::FailureKind::UpstreamAuth {
        (SyncPhase::Error, CONNECTION_FAILED_MESSAGE.to_string())
    } else {
        (SyncPhase::Error, failure.message.clone())
    }
}
