//! Demand-driven broadcast scheduler
//!
//! Owns the single repeating timer that advances the simulator and fans
//! new readings out to every subscriber. The timer runs only while at
//! least one subscriber is attached: the first attach starts it, the
//! last detach stops it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::history::ReadingLog;
use crate::sensor::TemperatureSimulator;

use super::events::StreamEvent;

/// Interval between broadcast ticks
const BROADCAST_INTERVAL: Duration = Duration::from_secs(5);

/// Buffered events per subscriber; clients that fall further behind
/// observe a lag error and skip ahead
const CHANNEL_CAPACITY: usize = 1024;

/// Broadcast scheduler for temperature readings
pub struct TemperatureBroadcaster {
    shared: Arc<Shared>,
    interval: Duration,
}

/// State shared with the timer task
struct Shared {
    tx: broadcast::Sender<StreamEvent>,
    state: Mutex<SchedulerState>,
    history: Arc<ReadingLog>,
}

/// Mutable scheduler state. Everything lives behind one mutex so the
/// demand-count check and timer start/stop form a single atomic step,
/// and `timer` is set if and only if `demand > 0`.
struct SchedulerState {
    simulator: TemperatureSimulator,
    demand: usize,
    timer: Option<JoinHandle<()>>,
    last_emitted: Option<String>,
}

impl TemperatureBroadcaster {
    /// Create a broadcaster with the default simulator and 5s interval
    pub fn new(history: Arc<ReadingLog>) -> Self {
        Self::with_config(TemperatureSimulator::new(), BROADCAST_INTERVAL, history)
    }

    /// Create a broadcaster with a custom simulator and tick interval
    pub fn with_config(
        simulator: TemperatureSimulator,
        interval: Duration,
        history: Arc<ReadingLog>,
    ) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                tx,
                state: Mutex::new(SchedulerState {
                    simulator,
                    demand: 0,
                    timer: None,
                    last_emitted: None,
                }),
                history,
            }),
            interval,
        }
    }

    /// Register demand and hand back the immediate snapshot plus the
    /// event receiver.
    ///
    /// The receiver is subscribed before the snapshot is computed, so a
    /// caller that sends the snapshot first observes it ahead of any
    /// value broadcast by a tick that fires after attach. The snapshot is
    /// the last emitted value, or a freshly generated one when the
    /// channel has been idle; a fresh snapshot advances the simulator but
    /// leaves the dedup state alone.
    pub fn subscribe(&self) -> (String, broadcast::Receiver<StreamEvent>) {
        let rx = self.shared.tx.subscribe();

        let mut state = self.shared.state.lock();
        state.demand += 1;
        let snapshot = match state.last_emitted.clone() {
            Some(value) => value,
            None => state.simulator.next_reading(),
        };
        if state.timer.is_none() {
            state.timer = Some(self.spawn_timer());
            eprintln!("[Broadcast] timer started (demand {})", state.demand);
        }

        (snapshot, rx)
    }

    /// Drop demand. When the last subscriber leaves, the timer is stopped
    /// and the dedup state cleared so the next activation starts clean.
    pub fn unsubscribe(&self) {
        let mut state = self.shared.state.lock();
        state.demand = state.demand.saturating_sub(1);
        if state.demand == 0 {
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.last_emitted = None;
            eprintln!("[Broadcast] timer stopped");
        }
    }

    /// Generate a one-off reading outside the broadcast cycle
    pub fn current_reading(&self) -> String {
        self.shared.state.lock().simulator.next_reading()
    }

    /// Number of currently registered subscribers
    pub fn demand(&self) -> usize {
        self.shared.state.lock().demand
    }

    /// Whether the broadcast timer is currently running
    pub fn is_streaming(&self) -> bool {
        self.shared.state.lock().timer.is_some()
    }

    fn spawn_timer(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first interval tick completes immediately; skip it so
            // ticks land at interval boundaries like a repeating timer
            ticker.tick().await;
            loop {
                ticker.tick().await;
                shared.tick();
            }
        })
    }
}

impl Shared {
    /// One broadcast tick: generate, dedup against the last emitted
    /// value, record and fan out. Delivery to slow or gone receivers is
    /// the channel's problem, never the timer's.
    fn tick(&self) {
        let mut state = self.state.lock();
        let value = state.simulator.next_reading();
        if state.last_emitted.as_deref() == Some(value.as_str()) {
            return;
        }
        state.last_emitted = Some(value.clone());
        drop(state);

        self.history.record(&value);
        // Send errors just mean no receivers are currently listening
        let _ = self.tx.send(StreamEvent::Temperature(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_broadcaster(min: f64, max: f64, interval_ms: u64) -> TemperatureBroadcaster {
        TemperatureBroadcaster::with_config(
            TemperatureSimulator::with_config(min, max, 0.4),
            Duration::from_millis(interval_ms),
            Arc::new(ReadingLog::new()),
        )
    }

    #[tokio::test]
    async fn test_subscribe_returns_immediate_snapshot() {
        // Interval far in the future: the snapshot must not wait for a tick
        let broadcaster = test_broadcaster(34.0, 38.0, 60_000);

        let (snapshot, _rx) = broadcaster.subscribe();
        assert_eq!(snapshot, "34.4");
    }

    #[tokio::test]
    async fn test_first_subscriber_starts_timer_last_stops_it() {
        let broadcaster = test_broadcaster(34.0, 38.0, 60_000);
        assert!(!broadcaster.is_streaming());

        let (_s1, _rx1) = broadcaster.subscribe();
        assert!(broadcaster.is_streaming());
        let (_s2, _rx2) = broadcaster.subscribe();
        assert_eq!(broadcaster.demand(), 2);

        broadcaster.unsubscribe();
        assert!(broadcaster.is_streaming());
        broadcaster.unsubscribe();
        assert!(!broadcaster.is_streaming());
        assert_eq!(broadcaster.demand(), 0);
    }

    #[tokio::test]
    async fn test_racing_subscribes_spawn_one_timer() {
        let broadcaster = test_broadcaster(34.0, 38.0, 50);
        let (_s1, mut rx) = broadcaster.subscribe();
        let (_s2, _rx2) = broadcaster.subscribe();

        // A second timer would double the tick rate; count events seen by
        // one receiver over a fixed window
        let mut count = 0usize;
        let window = tokio::time::sleep(Duration::from_millis(500));
        tokio::pin!(window);
        loop {
            tokio::select! {
                _ = &mut window => break,
                event = rx.recv() => {
                    if event.is_ok() {
                        count += 1;
                    }
                }
            }
        }
        assert!(count >= 3, "expected ticks in the window, got {}", count);
        assert!(count <= 12, "too many ticks for a single timer: {}", count);
    }

    #[tokio::test]
    async fn test_identical_consecutive_values_broadcast_once() {
        // Degenerate range: every tick generates the same value
        let broadcaster = test_broadcaster(36.0, 36.0, 20);
        let (_snapshot, mut rx) = broadcaster.subscribe();

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("first tick")
            .unwrap();
        assert_eq!(first, StreamEvent::Temperature("36.0".to_string()));

        // Every following tick regenerates "36.0" and must be suppressed
        let second = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(second.is_err(), "duplicate value was broadcast");
    }

    #[tokio::test]
    async fn test_restart_clears_dedup_state() {
        let broadcaster = test_broadcaster(36.0, 36.0, 20);

        let (_snapshot, mut rx) = broadcaster.subscribe();
        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("first tick")
            .unwrap();
        assert_eq!(first, StreamEvent::Temperature("36.0".to_string()));
        broadcaster.unsubscribe();

        // After a stop/start cycle the numerically equal value is
        // broadcast again instead of being suppressed by stale state
        let (_snapshot, mut rx) = broadcaster.subscribe();
        let next = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick after restart")
            .unwrap();
        assert_eq!(next, StreamEvent::Temperature("36.0".to_string()));
    }

    #[tokio::test]
    async fn test_late_joiner_sees_value_without_waiting() {
        let broadcaster = test_broadcaster(34.0, 38.0, 20);
        let (_s1, mut rx1) = broadcaster.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx1.recv())
            .await
            .expect("tick")
            .unwrap();

        // Mid-interval attach: snapshot is available synchronously
        let (snapshot, _rx2) = broadcaster.subscribe();
        let value: f64 = snapshot.parse().unwrap();
        assert!((34.0..=38.0).contains(&value));
    }

    #[tokio::test]
    async fn test_ticks_are_recorded_in_history() {
        let history = Arc::new(ReadingLog::new());
        let broadcaster = TemperatureBroadcaster::with_config(
            TemperatureSimulator::with_config(34.0, 38.0, 0.4),
            Duration::from_millis(20),
            Arc::clone(&history),
        );

        let (_snapshot, mut rx) = broadcaster.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick")
            .unwrap();

        assert!(!history.is_empty());
    }
}
