//! OS signal handling.
//!
//! # Responsibilities
//! - Subscribe to the configured signals for the lifetime of the worker
//! - Turn termination-class signals into a worker exit
//! - Log and ignore every other watched signal
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Subscriptions are owned by the running worker, not by a global
//! - Tokio never restores a signal's default disposition. Once the worker
//!   returns, further deliveries of a watched signal (e.g. a second SIGINT
//!   during the HTTP drain) are swallowed until the process exits; the
//!   drain is bounded by the grace period instead
//! - A termination signal is reported as `WorkerError::ShutdownRequested`
//!   so the supervisor treats it as the triggering exit

use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::SignalConfig;
use crate::lifecycle::shutdown::CancellationToken;
use crate::lifecycle::worker::{Worker, WorkerError};
use crate::observability::metrics;

/// A POSIX signal the watcher can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SignalName {
    Terminate,
    Hangup,
    Quit,
    Interrupt,
    User1,
    User2,
    WindowChange,
    Alarm,
    Child,
    Pipe,
    Io,
}

impl SignalName {
    pub const ALL: [SignalName; 11] = [
        SignalName::Terminate,
        SignalName::Hangup,
        SignalName::Quit,
        SignalName::Interrupt,
        SignalName::User1,
        SignalName::User2,
        SignalName::WindowChange,
        SignalName::Alarm,
        SignalName::Child,
        SignalName::Pipe,
        SignalName::Io,
    ];

    /// Conventional name, e.g. `SIGTERM`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::Terminate => "SIGTERM",
            SignalName::Hangup => "SIGHUP",
            SignalName::Quit => "SIGQUIT",
            SignalName::Interrupt => "SIGINT",
            SignalName::User1 => "SIGUSR1",
            SignalName::User2 => "SIGUSR2",
            SignalName::WindowChange => "SIGWINCH",
            SignalName::Alarm => "SIGALRM",
            SignalName::Child => "SIGCHLD",
            SignalName::Pipe => "SIGPIPE",
            SignalName::Io => "SIGIO",
        }
    }

    #[cfg(unix)]
    fn kind(&self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            SignalName::Terminate => SignalKind::terminate(),
            SignalName::Hangup => SignalKind::hangup(),
            SignalName::Quit => SignalKind::quit(),
            SignalName::Interrupt => SignalKind::interrupt(),
            SignalName::User1 => SignalKind::user_defined1(),
            SignalName::User2 => SignalKind::user_defined2(),
            SignalName::WindowChange => SignalKind::window_change(),
            SignalName::Alarm => SignalKind::alarm(),
            SignalName::Child => SignalKind::child(),
            SignalName::Pipe => SignalKind::pipe(),
            SignalName::Io => SignalKind::io(),
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a signal name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal name: {0}")]
pub struct UnknownSignal(pub String);

impl FromStr for SignalName {
    type Err = UnknownSignal;

    /// Accepts `SIGTERM`, `TERM` or `term`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let wanted = if upper.starts_with("SIG") {
            upper
        } else {
            format!("SIG{upper}")
        };

        SignalName::ALL
            .into_iter()
            .find(|signal| signal.as_str() == wanted)
            .ok_or_else(|| UnknownSignal(s.to_string()))
    }
}

impl TryFrom<String> for SignalName {
    type Error = UnknownSignal;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SignalName> for String {
    fn from(signal: SignalName) -> Self {
        signal.as_str().to_string()
    }
}

/// Worker that converts OS signals into the worker exit contract.
#[derive(Debug, Clone)]
pub struct SignalWorker {
    /// Signals that end the process.
    terminate: Vec<SignalName>,
    /// Signals that are logged and otherwise ignored.
    observe: Vec<SignalName>,
}

impl SignalWorker {
    pub fn new(terminate: Vec<SignalName>, observe: Vec<SignalName>) -> Self {
        Self { terminate, observe }
    }

    pub fn from_config(config: &SignalConfig) -> Self {
        Self::new(config.terminate.clone(), config.observe.clone())
    }

    /// Whether receipt of `signal` ends the worker.
    pub fn terminates_on(&self, signal: SignalName) -> bool {
        self.terminate.contains(&signal)
    }

    #[cfg(unix)]
    async fn watch(self, token: CancellationToken) -> Result<(), WorkerError> {
        use futures_util::future::select_all;
        use tokio::signal::unix::signal;

        let mut watched = Vec::new();
        let mut streams = Vec::new();

        let all = self
            .terminate
            .iter()
            .map(|s| (*s, true))
            .chain(self.observe.iter().map(|s| (*s, false)));

        for (name, terminates) in all {
            let stream = signal(name.kind()).map_err(|source| WorkerError::SignalSetup {
                signal: name,
                source,
            })?;
            watched.push((name, terminates));
            streams.push(stream);
        }

        tracing::info!(
            terminate = ?self.terminate,
            observe = ?self.observe,
            "Signal watcher started"
        );

        if streams.is_empty() {
            token.cancelled().await;
            tracing::info!("Signal watcher stopping");
            return Ok(());
        }

        loop {
            let next = select_all(streams.iter_mut().map(|stream| Box::pin(stream.recv())));

            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Signal watcher stopping");
                    return Ok(());
                }
                (received, index, _) = next => {
                    let (signal, terminates) = watched[index];

                    if received.is_none() {
                        return Err(WorkerError::SignalStream { signal });
                    }

                    if terminates {
                        metrics::record_signal(signal.as_str(), "exit");
                        tracing::info!(signal = %signal, "Received signal, exiting");
                        return Err(WorkerError::ShutdownRequested { signal });
                    }

                    metrics::record_signal(signal.as_str(), "ignore");
                    tracing::info!(signal = %signal, "Received signal, continuing");
                }
            }
        }
    }

    #[cfg(not(unix))]
    async fn watch(self, token: CancellationToken) -> Result<(), WorkerError> {
        tracing::info!("Signal watcher started (Ctrl-C only)");

        tokio::select! {
            _ = token.cancelled() => {
                tracing::info!("Signal watcher stopping");
                Ok(())
            }
            result = tokio::signal::ctrl_c() => {
                let signal = SignalName::Interrupt;
                result.map_err(|source| WorkerError::SignalSetup { signal, source })?;
                metrics::record_signal(signal.as_str(), "exit");
                tracing::info!(signal = %signal, "Received signal, exiting");
                Err(WorkerError::ShutdownRequested { signal })
            }
        }
    }
}

impl Default for SignalWorker {
    fn default() -> Self {
        Self::from_config(&SignalConfig::default())
    }
}

impl Worker for SignalWorker {
    fn name(&self) -> &str {
        "signals"
    }

    fn run(self: Box<Self>, token: CancellationToken) -> BoxFuture<'static, Result<(), WorkerError>> {
        self.watch(token).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_signal_names() {
        assert_eq!("SIGTERM".parse::<SignalName>().unwrap(), SignalName::Terminate);
        assert_eq!("hup".parse::<SignalName>().unwrap(), SignalName::Hangup);
        assert_eq!(" sigusr1 ".parse::<SignalName>().unwrap(), SignalName::User1);
        assert!("SIGKILLME".parse::<SignalName>().is_err());
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for signal in SignalName::ALL {
            assert_eq!(signal.to_string().parse::<SignalName>().unwrap(), signal);
        }
    }

    #[test]
    fn test_default_terminate_set() {
        let worker = SignalWorker::default();
        for signal in [
            SignalName::Terminate,
            SignalName::Hangup,
            SignalName::Quit,
            SignalName::Interrupt,
        ] {
            assert!(worker.terminates_on(signal), "{signal} should terminate");
        }
        assert!(!worker.terminates_on(SignalName::User1));
    }

    #[tokio::test]
    async fn test_cancellation_stops_watcher() {
        let token = CancellationToken::new();
        let worker: Box<dyn Worker> = Box::new(SignalWorker::new(vec![], vec![SignalName::WindowChange]));

        let handle = tokio::spawn(worker.run(token.clone()));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        token.trigger();
        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("watcher ignored cancellation")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_empty_watch_set_waits_for_cancellation() {
        let token = CancellationToken::new();
        token.trigger();

        let worker: Box<dyn Worker> = Box::new(SignalWorker::new(vec![], vec![]));
        let result = tokio::time::timeout(Duration::from_secs(1), worker.run(token))
            .await
            .expect("watcher ignored cancellation");
        assert!(result.is_ok());
    }
}
