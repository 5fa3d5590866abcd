//! Signal watcher tests.
//!
//! Signals are process-wide, so everything runs inside one test function.
#![cfg(unix)]

use std::time::Duration;

use lifeline::config::HttpConfig;
use lifeline::http::{build_router, HttpWorker};
use lifeline::lifecycle::Worker;
use lifeline::{CancellationToken, SignalName, SignalWorker, Supervisor, WorkerError};

mod common;

fn raise(signal: libc::c_int) {
    let rc = unsafe { libc::kill(libc::getpid(), signal) };
    assert_eq!(rc, 0, "failed to send signal {signal}");
}

#[tokio::test]
async fn test_signal_watcher_contract() {
    // Ignored signals do not end the worker; a termination signal does.
    let token = CancellationToken::new();
    let worker: Box<dyn Worker> = Box::new(SignalWorker::new(
        vec![SignalName::Terminate],
        vec![SignalName::User1],
    ));
    let handle = tokio::spawn(worker.run(token.clone()));
    tokio::time::sleep(Duration::from_millis(100)).await;

    raise(libc::SIGUSR1);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished(), "SIGUSR1 must not end the watcher");

    raise(libc::SIGTERM);
    let result = common::within(5, handle).await.unwrap();
    assert!(matches!(
        result,
        Err(WorkerError::ShutdownRequested { signal: SignalName::Terminate })
    ));

    // Through the supervisor, a termination signal stops the HTTP worker too.
    let (listener, addr) = common::local_listener().await;
    let token = CancellationToken::new();
    let mut supervisor = Supervisor::new(token.clone());
    supervisor
        .register(HttpWorker::with_listener(
            listener,
            build_router(token.clone(), &HttpConfig::default()),
        ))
        .register(SignalWorker::new(vec![SignalName::Hangup], vec![]));

    let run = tokio::spawn(supervisor.run());
    tokio::time::sleep(Duration::from_millis(100)).await;
    raise(libc::SIGHUP);

    let err = common::within(5, run).await.unwrap().unwrap_err();
    assert!(matches!(
        err.worker_error(),
        Some(WorkerError::ShutdownRequested { signal: SignalName::Hangup })
    ));
    assert!(token.is_cancelled());
    assert!(!common::accepts_connections(addr).await);
}
