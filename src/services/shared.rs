//! Unified shared state for all display services.
//!
//! `SharedDisplay` provides thread-safe access to a single `SegmentDevice`
//! that can be shared between the web and MQTT services.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rs_sseg::config::DisplayConfig;
//! use rs_sseg::hal::RecordingBank;
//! use rs_sseg::services::SharedDisplay;
//! use rs_sseg::SegmentDevice;
//!
//! let device = SegmentDevice::new(RecordingBank::new(), &DisplayConfig::default()).unwrap();
//! let display = Arc::new(SharedDisplay::new(device));
//!
//! // Web and MQTT handlers write through the same device
//! display.write(b"HELLO").unwrap();
//! assert_eq!(display.state().text.as_str(), "HELLO");
//!
//! // Change detection for MQTT publishing
//! assert!(display.check_changes().is_some());
//! assert!(display.check_changes().is_none());
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use heapless::Vec as HVec;

use crate::config::MAX_WRITE_LEN;
use crate::device::{trim_line_ending, DeviceError, DisplaySession, SegmentDevice};
use crate::messages::DisplayState;
use crate::traits::DigitalOutputBank;

/// Device plus what was last written to it.
struct DisplayInner<B> {
    device: SegmentDevice<B>,
    last_input: HVec<u8, MAX_WRITE_LEN>,
    writes: u64,
}

impl<B: DigitalOutputBank> DisplayInner<B> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, DeviceError<B::Error>> {
        let accepted = self.device.open().write(bytes)?;
        self.remember(bytes);
        Ok(accepted)
    }

    fn clear(&mut self) -> Result<(), DeviceError<B::Error>> {
        self.device.clear()?;
        self.remember(&[]);
        Ok(())
    }

    fn write_then_snapshot(
        &mut self,
        bytes: &[u8],
    ) -> Result<(usize, DisplayState), DeviceError<B::Error>> {
        let accepted = self.write(bytes)?;
        Ok((accepted, self.state()))
    }

    fn remember(&mut self, bytes: &[u8]) {
        let kept = trim_line_ending(&bytes[..bytes.len().min(self.device.max_write_len())]);
        self.last_input.clear();
        let _ = self.last_input.extend_from_slice(kept);
        self.writes += 1;
    }

    fn state(&self) -> DisplayState {
        DisplayState::new(&self.last_input, self.device.last_frame(), self.writes)
    }
}

// ============================================================================
// Shared Display
// ============================================================================

/// Shared display for all services (web, MQTT).
///
/// # Thread Safety
///
/// - One `Mutex` guards the device, so a frame is always shifted and committed
///   by a single writer.
/// - `write` and `clear` wait for the device; `try_write` and `try_open`
///   report [`DeviceError::Busy`] instead of waiting.
/// - Change detection has a separate lock so publishers never block writers
///   for longer than a snapshot.
pub struct SharedDisplay<B> {
    inner: Mutex<DisplayInner<B>>,
    last_published: Mutex<Option<u64>>,
}

impl<B: DigitalOutputBank> SharedDisplay<B> {
    /// Wrap a device that is already up.
    pub fn new(device: SegmentDevice<B>) -> Self {
        Self {
            inner: Mutex::new(DisplayInner {
                device,
                last_input: HVec::new(),
                writes: 0,
            }),
            last_published: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DisplayInner<B>> {
        // a half-shifted frame is overwritten by the next commit
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_lock(&self) -> Result<MutexGuard<'_, DisplayInner<B>>, DeviceError<B::Error>> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => Err(DeviceError::Busy),
        }
    }

    /// Write `bytes`, waiting for any other writer to finish.
    pub fn write(&self, bytes: &[u8]) -> Result<usize, DeviceError<B::Error>> {
        self.lock().write(bytes)
    }

    /// Write `bytes`, or fail with [`DeviceError::Busy`] if another writer
    /// holds the device.
    pub fn try_write(&self, bytes: &[u8]) -> Result<usize, DeviceError<B::Error>> {
        self.try_lock()?.write(bytes)
    }

    /// Like [`Self::try_write`], also returning the state this write left
    /// behind, taken before the lock is released.
    pub fn try_write_with_state(
        &self,
        bytes: &[u8],
    ) -> Result<(usize, DisplayState), DeviceError<B::Error>> {
        self.try_lock()?.write_then_snapshot(bytes)
    }

    /// Blank the display.
    pub fn clear(&self) -> Result<(), DeviceError<B::Error>> {
        self.lock().clear()
    }

    /// Blank the display and return the resulting state, or fail with
    /// [`DeviceError::Busy`] if another writer holds the device.
    pub fn try_clear(&self) -> Result<DisplayState, DeviceError<B::Error>> {
        let mut inner = self.try_lock()?;
        inner.clear()?;
        Ok(inner.state())
    }

    /// Run `f` with an exclusive session, or fail with [`DeviceError::Busy`].
    ///
    /// Writes made through the session are not tracked in [`Self::state`]'s
    /// `text`, only in its frame.
    pub fn try_open<R, F>(&self, f: F) -> Result<R, DeviceError<B::Error>>
    where
        F: FnOnce(&mut DisplaySession<'_, B>) -> R,
    {
        let mut guard = self.try_lock()?;
        let mut session = guard.device.open();
        Ok(f(&mut session))
    }

    /// Access the device with the lock held.
    pub fn with_device<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut SegmentDevice<B>) -> R,
    {
        f(&mut self.lock().device)
    }

    /// Snapshot of the display.
    pub fn state(&self) -> DisplayState {
        self.lock().state()
    }

    /// Returns the state if anything was written since the last call.
    pub fn check_changes(&self) -> Option<DisplayState> {
        let state = self.state();
        let mut last = self
            .last_published
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *last == Some(state.writes) {
            None
        } else {
            *last = Some(state.writes);
            Some(state)
        }
    }
}
