use std::sync::{Mutex, MutexGuard};

/// Where the scanner SDK is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkState {
    Uninitialized,
    Initializing,
    Ready,
    Destroyed,
}

/// Process-wide guard so only one screen ever owns the SDK.
///
/// `acquire` and `release` are idempotent: a second acquire while the SDK is
/// initializing or ready is refused, and releasing an SDK nobody holds does
/// nothing.
#[derive(Debug)]
pub struct SdkLifecycle {
    state: Mutex<SdkState>,
}

static GLOBAL: SdkLifecycle = SdkLifecycle::new();

impl SdkLifecycle {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(SdkState::Uninitialized),
        }
    }

    /// The lifecycle shared by the whole process.
    pub fn global() -> &'static SdkLifecycle {
        &GLOBAL
    }

    fn lock(&self) -> MutexGuard<'_, SdkState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> SdkState {
        *self.lock()
    }

    /// Claim the SDK. Returns `true` when the caller should initialize it.
    pub fn acquire(&self) -> bool {
        let mut state = self.lock();
        match *state {
            SdkState::Uninitialized | SdkState::Destroyed => {
                *state = SdkState::Initializing;
                true
            }
            SdkState::Initializing | SdkState::Ready => false,
        }
    }

    pub fn mark_ready(&self) {
        let mut state = self.lock();
        if *state == SdkState::Initializing {
            *state = SdkState::Ready;
        }
    }

    /// Initialization failed; let the next screen try again.
    pub fn mark_failed(&self) {
        let mut state = self.lock();
        if *state == SdkState::Initializing {
            *state = SdkState::Uninitialized;
        }
    }

    /// Give the SDK up. Returns `true` when the caller should tear it down.
    pub fn release(&self) -> bool {
        let mut state = self.lock();
        match *state {
            SdkState::Initializing | SdkState::Ready => {
                *state = SdkState::Destroyed;
                true
            }
            SdkState::Uninitialized | SdkState::Destroyed => false,
        }
    }
}

impl Default for SdkLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
