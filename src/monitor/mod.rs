//! The monitoring engine: one prober task per endpoint, a shared event
//! channel, and a single aggregator draining it.
//!
//! Probers own their state exclusively and only ever touch the channel, so
//! the whole engine needs no locks. The channel is bounded; a slow aggregator
//! throttles every prober through the blocking send.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::alert::Notifier;
use crate::duration::format_duration;
use crate::endpoint::Endpoint;
use crate::logfile::LogFile;
use crate::probe::{Checker, Event, EventKind, ProberState};

/// Capacity of the shared event channel. Small on purpose: the only
/// backpressure between probers and the aggregator.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Owns the probers and the aggregator for one monitoring run.
pub struct Monitor {
    endpoints: Vec<Endpoint>,
    checker: Arc<dyn Checker>,
    cancel: CancellationToken,
}

impl Monitor {
    pub fn new(
        endpoints: Vec<Endpoint>,
        checker: Arc<dyn Checker>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            endpoints,
            checker,
            cancel,
        }
    }

    /// Run until the cancellation token fires, then drain. Spawns one prober
    /// per endpoint, all feeding one channel, and consumes events inline.
    /// Returns once every prober has exited and the last event is written.
    pub async fn run(
        self,
        console: Box<dyn Write + Send>,
        logfile: LogFile,
        notifier: Option<Notifier>,
    ) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        tracing::info!("starting {} probers", self.endpoints.len());
        for endpoint in self.endpoints {
            tokio::spawn(run_prober(
                endpoint,
                self.checker.clone(),
                tx.clone(),
                self.cancel.clone(),
            ));
        }
        // The aggregator's recv() sees the channel close once the last
        // prober drops its sender.
        drop(tx);

        run_aggregator(rx, console, logfile, notifier).await;
    }
}

/// Check/classify/wait loop for one endpoint.
///
/// The first check happens immediately; afterwards the interval timer is the
/// only throttle. Cancellation is honored at the tick and around the network
/// call, so shutdown never waits for a full period.
async fn run_prober(
    endpoint: Endpoint,
    checker: Arc<dyn Checker>,
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
) {
    let hello = Event::new(
        endpoint.identifier(),
        EventKind::Check,
        format!(
            "started probing {} every {}",
            endpoint.identifier(),
            format_duration(endpoint.frequency())
        ),
    );
    if tx.send(hello).await.is_err() {
        return;
    }

    let mut state = ProberState::new();
    let mut interval = tokio::time::interval(endpoint.frequency());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = checker.check(&endpoint) => outcome,
        };

        for event in state.classify(&endpoint, &outcome) {
            if tx.send(event).await.is_err() {
                return;
            }
        }
    }

    tracing::debug!(identifier = endpoint.identifier(), "prober stopped");
}

/// Single consumer of the event channel. Writes each event exactly once, in
/// arrival order, to the console stream and the log file, and hands
/// alert-class events to the notifier.
async fn run_aggregator(
    mut rx: mpsc::Receiver<Event>,
    mut console: Box<dyn Write + Send>,
    mut logfile: LogFile,
    notifier: Option<Notifier>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = writeln!(console, "{}", event.text) {
            tracing::warn!("write event to console: {e}");
        }
        if let Err(e) = logfile.write_line(&event.text) {
            tracing::error!("write event to {}: {e}", logfile.path().display());
        }
        if event.kind == EventKind::Alert {
            if let Some(notifier) = &notifier {
                let notifier = notifier.clone();
                let text = event.text.clone();
                tokio::spawn(async move { notifier.notify(&text).await });
            }
        }
    }
    tracing::info!("event channel drained, closing {}", logfile.path().display());
}
