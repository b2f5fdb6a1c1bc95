use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::trace;

/// Requests the media engine makes of the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    /// Events are queued; drain them
    Wakeup,
    /// A new video frame is ready to be drawn
    Redraw,
}

/// Handed to engine callbacks, which may run on libmpv's own threads.
/// Sending never blocks and never touches UI or engine state.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<EngineSignal>,
    frame_pending: Arc<AtomicBool>,
}

impl SignalSender {
    pub fn wakeup(&self) {
        let _ = self.tx.send(EngineSignal::Wakeup);
    }

    /// Queue a redraw unless one is already waiting to be presented.
    pub fn redraw(&self) {
        if self.frame_pending.swap(true, Ordering::AcqRel) {
            trace!("Frame already pending, coalescing redraw");
            return;
        }
        if self.tx.send(EngineSignal::Redraw).is_err() {
            self.frame_pending.store(false, Ordering::Release);
        }
    }
}

/// UI-side end of the channel, consumed on the main loop.
#[derive(Debug)]
pub struct SignalReceiver {
    rx: mpsc::UnboundedReceiver<EngineSignal>,
    frame_pending: Arc<AtomicBool>,
}

impl SignalReceiver {
    /// Next signal, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<EngineSignal> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<EngineSignal> {
        self.rx.try_recv().ok()
    }

    pub fn frame_gate(&self) -> FrameGate {
        FrameGate {
            frame_pending: self.frame_pending.clone(),
        }
    }
}

/// Lets the renderer re-arm redraw requests after a frame is drawn.
#[derive(Debug, Clone)]
pub struct FrameGate {
    frame_pending: Arc<AtomicBool>,
}

impl FrameGate {
    pub fn presented(&self) {
        self.frame_pending.store(false, Ordering::Release);
    }
}

pub fn channel() -> (SignalSender, SignalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let frame_pending = Arc::new(AtomicBool::new(false));
    (
        SignalSender {
            tx,
            frame_pending: frame_pending.clone(),
        },
        SignalReceiver { rx, frame_pending },
    )
}
