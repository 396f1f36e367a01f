use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::pipeline::handoff::ResetHandle;
use crate::shared::error::OverlayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    AwaitingPermission,
    Blocked,
    Active,
    Paused,
    TornDown,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Uninitialized => "Uninitialized",
            PipelineState::AwaitingPermission => "AwaitingPermission",
            PipelineState::Blocked => "Blocked",
            PipelineState::Active => "Active",
            PipelineState::Paused => "Paused",
            PipelineState::TornDown => "TornDown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Lifecycle of one overlay session.
///
/// ```text
/// Uninitialized → AwaitingPermission → Blocked | Active
/// Active ⇄ Paused
/// * → TornDown
/// ```
///
/// Owns the run flag read by the capture thread. Leaving `Active` clears the
/// flag first and then the handoff, so the UI's next read is empty even if a
/// set was published just before.
pub struct PipelineController {
    state: PipelineState,
    active: Arc<AtomicBool>,
    reset: ResetHandle,
    blocked_reason: Option<OverlayError>,
}

impl PipelineController {
    pub fn new(reset: ResetHandle) -> Self {
        Self {
            state: PipelineState::Uninitialized,
            active: Arc::new(AtomicBool::new(false)),
            reset,
            blocked_reason: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Flag to hand to the detection pipeline.
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    /// Why the session is `Blocked`, if it is.
    pub fn blocked_reason(&self) -> Option<&OverlayError> {
        self.blocked_reason.as_ref()
    }

    /// Also used to retry from `Blocked` after the user changed settings.
    pub fn request_permission(&mut self) -> Result<(), OverlayError> {
        match self.state {
            PipelineState::Uninitialized | PipelineState::Blocked => {
                self.blocked_reason = None;
                self.transition(PipelineState::AwaitingPermission);
                Ok(())
            }
            _ => Err(self.invalid("request permission")),
        }
    }

    pub fn start(
        &mut self,
        permission: PermissionStatus,
        device_available: bool,
    ) -> Result<(), OverlayError> {
        if self.state != PipelineState::AwaitingPermission {
            return Err(self.invalid("start"));
        }

        let failure = match (permission, device_available) {
            (PermissionStatus::Denied, _) => Some(OverlayError::PermissionDenied),
            (PermissionStatus::Granted, false) => Some(OverlayError::DeviceUnavailable),
            (PermissionStatus::Granted, true) => None,
        };

        if let Some(err) = failure {
            log::warn!("Overlay pipeline blocked: {err}");
            self.blocked_reason = Some(err.clone());
            self.transition(PipelineState::Blocked);
            return Err(err);
        }

        self.active.store(true, Ordering::Release);
        self.transition(PipelineState::Active);
        Ok(())
    }

    /// Camera deactivated. No-op when already paused.
    pub fn pause(&mut self) -> Result<(), OverlayError> {
        match self.state {
            PipelineState::Active => {
                self.deactivate();
                self.transition(PipelineState::Paused);
                Ok(())
            }
            PipelineState::Paused => Ok(()),
            _ => Err(self.invalid("pause")),
        }
    }

    /// Camera reactivated. No-op when already active.
    pub fn resume(&mut self) -> Result<(), OverlayError> {
        match self.state {
            PipelineState::Paused => {
                self.active.store(true, Ordering::Release);
                self.transition(PipelineState::Active);
                Ok(())
            }
            PipelineState::Active => Ok(()),
            _ => Err(self.invalid("resume")),
        }
    }

    /// Idempotent.
    pub fn tear_down(&mut self) {
        if self.state == PipelineState::TornDown {
            return;
        }
        self.deactivate();
        self.transition(PipelineState::TornDown);
    }

    fn deactivate(&mut self) {
        self.active.store(false, Ordering::Release);
        self.reset.clear();
    }

    fn transition(&mut self, next: PipelineState) {
        log::info!("Overlay pipeline: {} -> {}", self.state, next);
        self.state = next;
    }

    fn invalid(&self, action: &'static str) -> OverlayError {
        OverlayError::InvalidTransition {
            from: self.state.to_string(),
            action,
        }
    }
}

impl Drop for PipelineController {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}
