//! Bounded channel shared between threads
//!
//! A multi-sender queue built on `critical-section` and `heapless::Deque`.
//! Handles share the queue through an `Arc`, so a sender can move into a
//! watcher thread while the engine keeps the receiver.

use core::cell::RefCell;
use std::sync::Arc;

use critical_section::Mutex;
use heapless::Deque;

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, thread-safe queue.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value).map_err(TrySendError)
        })
    }

    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a channel and return both ends
pub fn channel<T, const SIZE: usize>() -> (Sender<T, SIZE>, Receiver<T, SIZE>) {
    let shared = Arc::new(Channel::new());
    (
        Sender {
            channel: Arc::clone(&shared),
        },
        Receiver { channel: shared },
    )
}

/// A sender handle for a [`Channel`].
pub struct Sender<T, const SIZE: usize> {
    channel: Arc<Channel<T, SIZE>>,
}

impl<T, const SIZE: usize> Clone for Sender<T, SIZE> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
        }
    }
}

impl<T, const SIZE: usize> Sender<T, SIZE> {
    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }
}

/// The receiving end of a [`Channel`].
pub struct Receiver<T, const SIZE: usize> {
    channel: Arc<Channel<T, SIZE>>,
}

impl<T, const SIZE: usize> Receiver<T, SIZE> {
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }

    /// Number of queued values
    pub fn pending(&self) -> usize {
        self.channel.len()
    }
}
