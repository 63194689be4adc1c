//! QR attendance scanning.
//!
//! A [`ScanFlow`] receives decoded text from an external QR decoder, looks
//! up the device position once and submits the mark-attendance mutation.
//! Progress is published as a [`ScanState`] on a watch channel.

pub mod location;
mod payload;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rollcall_core::{ClientError, Notification};
use rollcall_models::SessionId;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

pub use location::{
    FixedLocation, LOCATION_REQUIRED_MESSAGE, LocationProvider, PositionOptions, locate,
};
pub use payload::{InvalidQrPayload, QrPayload};

use crate::modules::attendance;
use crate::state::AppContext;

/// Identical payloads inside this window are processed once.
pub const DUPLICATE_WINDOW: Duration = Duration::from_secs(2);

pub const SUCCESS_MESSAGE: &str = "Attendance marked successfully!";

const SUBMIT_FAILED_MESSAGE: &str = "Failed to mark attendance";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Submitting,
    Success {
        session_id: SessionId,
    },
    Failed {
        message: String,
    },
}

impl ScanState {
    fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Whether a decoded frame should be processed in this state.
    fn accepts_frames(&self) -> bool {
        matches!(self, ScanState::Scanning | ScanState::Failed { .. })
    }
}

pub struct ScanFlow {
    ctx: AppContext,
    location: Arc<dyn LocationProvider>,
    options: PositionOptions,
    state: watch::Sender<ScanState>,
    last_payload: Mutex<Option<(String, Instant)>>,
}

impl ScanFlow {
    pub fn new(ctx: AppContext, location: Arc<dyn LocationProvider>) -> Self {
        let (state, _) = watch::channel(ScanState::Idle);
        Self {
            ctx,
            location,
            options: PositionOptions::default(),
            state,
            last_payload: Mutex::new(None),
        }
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> ScanState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state.subscribe()
    }

    pub fn start(&self) {
        self.set(ScanState::Scanning);
    }

    pub fn stop(&self) {
        self.set(ScanState::Idle);
    }

    /// A frame the decoder could not read. Expected constantly while the
    /// camera is pointed at anything but a code.
    pub fn decode_failed(&self, reason: &str) {
        debug!(reason, "frame not decoded");
    }

    /// Processes one decoded payload and returns the resulting state.
    #[instrument(skip(self, text))]
    pub async fn decoded(&self, text: &str) -> ScanState {
        if !self.state.borrow().accepts_frames() {
            return self.state();
        }
        if self.is_duplicate(text) {
            debug!("duplicate payload dropped");
            return self.state();
        }

        let payload = match QrPayload::parse(text) {
            Ok(payload) => payload,
            Err(err) => {
                self.claim(ScanState::failed(err.to_string()));
                return self.state();
            }
        };

        if !self.claim(ScanState::Submitting) {
            debug!("another payload is already being submitted");
            return self.state();
        }

        let position = match locate(self.location.as_ref(), &self.options).await {
            Ok(position) => position,
            Err(err) => {
                warn!(error = %err, "geolocation failed");
                return self.set(ScanState::failed(LOCATION_REQUIRED_MESSAGE));
            }
        };

        match attendance::queries::mark_qr(&self.ctx, payload.qr_code_id, Some(position)).await {
            Ok(record) => {
                info!(session_id = %record.session.id, "attendance marked by QR");
                self.ctx
                    .notifier
                    .notify(Notification::success(SUCCESS_MESSAGE));
                self.set(ScanState::Success {
                    session_id: record.session.id,
                })
            }
            Err(ClientError::Domain { message, .. }) => self.set(ScanState::failed(message)),
            Err(err) => {
                warn!(error = %err, "attendance submission failed");
                self.set(ScanState::failed(SUBMIT_FAILED_MESSAGE))
            }
        }
    }

    fn is_duplicate(&self, text: &str) -> bool {
        let now = Instant::now();
        let mut last = self
            .last_payload
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some((previous, at)) = last.as_ref() {
            if previous == text && now.duration_since(*at) < DUPLICATE_WINDOW {
                return true;
            }
        }
        *last = Some((text.to_string(), now));
        false
    }

    /// Moves to `next` only if the current state still accepts frames,
    /// checking and transitioning in one step.
    fn claim(&self, next: ScanState) -> bool {
        self.state.send_if_modified(|state| {
            if !state.accepts_frames() {
                return false;
            }
            *state = next;
            true
        })
    }

    fn set(&self, next: ScanState) -> ScanState {
        self.state.send_replace(next.clone());
        next
    }
}
