//! Display frame scheduling
//!
//! Mirrors the browser's `requestAnimationFrame` / `cancelAnimationFrame`
//! pair: a frame is requested, later delivered with a timestamp, and can be
//! cancelled before delivery. A cancelled handle is never delivered.

use std::cell::RefCell;
use std::rc::Rc;

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can deliver display frames
pub trait FrameScheduler {
    /// Ask for one more frame
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a request that has not been delivered yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct QueueInner {
    next_id: u64,
    pending: Vec<FrameHandle>,
    cancelled: u64,
}

/// Frame scheduler driven by an external clock.
///
/// Clones share one queue: the game loop requests frames through one clone
/// and the host takes due frames from another.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every frame requested so far, in request order
    pub fn take_due(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.inner.borrow_mut().pending)
    }

    /// Number of requests waiting for delivery
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Requests withdrawn before delivery
    pub fn cancelled(&self) -> u64 {
        self.inner.borrow().cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let handle = FrameHandle(inner.next_id);
        inner.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.pending.len();
        inner.pending.retain(|h| *h != handle);
        if inner.pending.len() != before {
            inner.cancelled += 1;
            log::debug!("cancelled frame {}", handle.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_take() {
        let mut queue = FrameQueue::new();
        let host = queue.clone();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.pending(), 2);
        assert_eq!(host.take_due(), vec![a, b]);
        assert!(host.take_due().is_empty());
    }

    #[test]
    fn test_cancel_removes_pending() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        queue.cancel_frame(a);
        assert_eq!(queue.take_due(), vec![b]);
        assert_eq!(queue.cancelled(), 1);

        // Cancelling a delivered frame is a no-op
        queue.cancel_frame(b);
        assert_eq!(queue.cancelled(), 1);
    }
}
