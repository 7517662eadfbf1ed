use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

/// A fired timer, delivered back to the UI loop. All state mutation happens
/// there, so ordering within a flow stays strictly sequential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// The thinking delay elapsed; assemble the canned response now.
    ResponseReady,
    /// The go-live latency elapsed; append the success message.
    GoLiveComplete,
    /// The animation window elapsed; the rocket is done.
    AnimationComplete,
}

/// Orchestrates the two timed flows (submit and go-live) as fire-once tokio
/// timers. The flows are independent: each is gated only by its own flag, and
/// both can be in flight at once.
pub struct Sequencer {
    tx: UnboundedSender<SequencerEvent>,
    cancel: CancellationToken,
    pub is_thinking: bool,
    pub is_going_live: bool,
    pub missile_active: bool,
    thinking_delay: Duration,
    go_live_latency: Duration,
}

impl Sequencer {
    pub fn new(
        thinking_delay: Duration,
        go_live_latency: Duration,
    ) -> (Self, UnboundedReceiver<SequencerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sequencer = Self {
            tx,
            cancel: CancellationToken::new(),
            is_thinking: false,
            is_going_live: false,
            missile_active: false,
            thinking_delay,
            go_live_latency,
        };
        (sequencer, rx)
    }

    /// Enters the thinking state and schedules the canned-response step.
    /// The caller appends the user message first.
    pub fn start_thinking(&mut self) {
        self.is_thinking = true;
        self.schedule(self.thinking_delay, SequencerEvent::ResponseReady);
    }

    /// Enters the go-live state. The success message and the animation end
    /// are two independently expiring timers: they start together but their
    /// durations are not coupled.
    pub fn start_go_live(&mut self, animation_window: Duration) {
        self.is_going_live = true;
        self.missile_active = true;
        self.schedule(self.go_live_latency, SequencerEvent::GoLiveComplete);
        self.schedule(animation_window, SequencerEvent::AnimationComplete);
    }

    /// Cancels every pending timer so a torn-down view receives nothing.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn schedule(&self, delay: Duration, event: SequencerEvent) {
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // The receiver may already be gone; a late fire is a no-op.
                    let _ = tx.send(event);
                }
            }
        });
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    fn sequencer() -> (Sequencer, UnboundedReceiver<SequencerEvent>) {
        Sequencer::new(Duration::from_millis(2000), Duration::from_millis(4500))
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn response_fires_after_the_thinking_delay() {
        let (mut seq, mut rx) = sequencer();
        seq.start_thinking();
        assert!(seq.is_thinking);
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.try_recv(), Ok(SequencerEvent::ResponseReady));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn go_live_timers_expire_independently_animation_first() {
        let (mut seq, mut rx) = sequencer();
        seq.start_go_live(Duration::from_millis(4000));
        assert!(seq.is_going_live);
        assert!(seq.missile_active);

        // Auto-advance walks the paused clock to each pending timer in order.
        assert_eq!(rx.recv().await, Some(SequencerEvent::AnimationComplete));
        assert_eq!(rx.recv().await, Some(SequencerEvent::GoLiveComplete));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn shutdown_suppresses_pending_timers() {
        let (mut seq, mut rx) = sequencer();
        seq.start_thinking();
        tokio::task::yield_now().await;

        seq.shutdown();
        tokio::time::advance(Duration::from_millis(5000)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn dropping_the_sequencer_cancels_its_timers() {
        let (mut seq, mut rx) = sequencer();
        seq.start_thinking();
        tokio::task::yield_now().await;

        drop(seq);
        tokio::time::advance(Duration::from_millis(5000)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn a_fire_into_a_dropped_receiver_is_a_no_op() {
        let (mut seq, rx) = sequencer();
        seq.start_thinking();
        tokio::task::yield_now().await;

        drop(rx);
        // Must not panic when the timer fires into the closed channel.
        tokio::time::advance(Duration::from_millis(2500)).await;
        tokio::task::yield_now().await;
    }
}
