//! Server loop (spec C7): accepts connections, enqueues work, detects
//! the lottery trigger via an accept-idle timeout, orchestrates the
//! barrier and winner fan-out, and handles shutdown.

use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError as MpscTimeout};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use lottery_config::LotteryConfig;

use crate::error::ServerError;
use crate::lottery::LotteryAgency;
use crate::signal;
use crate::store::BetStore;
use crate::work_item::WorkItem;
use crate::worker::{self, WorkerContext};

/// Shortest interval the server loop waits between checks of the
/// cancellation flag while idling on new connections.
const POLL_TICK: Duration = Duration::from_millis(200);

/// What caused the accept loop to stop accepting new connections.
enum Trigger {
    /// No connection arrived for the configured idle timeout: time to
    /// run the lottery.
    Barrier,
    /// A cancellation signal was observed, or the acceptor thread died.
    Shutdown,
}

/// Owns the listener, worker pool and parked-connection registry for
/// one run of the lottery agency server.
pub struct LotteryServer {
    config: LotteryConfig,
}

impl LotteryServer {
    /// Build a server from a fully validated configuration.
    pub fn new(config: LotteryConfig) -> Self {
        Self { config }
    }

    /// Run the server to completion: `Accepting -> Barrier -> Draining
    /// -> Stopped`, or `Accepting -> Draining -> Stopped` on
    /// cancellation.
    pub fn run(self) -> Result<(), ServerError> {
        let listener =
            TcpListener::bind(&self.config.server.listen).map_err(|source| ServerError::Bind {
                addr: self.config.server.listen.clone(),
                source,
            })?;
        listener.listen_backlog_hint(self.config.server.backlog);

        let store = Arc::new(Mutex::new(BetStore::open(&self.config.lottery.store_path)?));

        let workers_n = self.config.server.workers;
        let (work_tx, work_rx) = bounded::<WorkItem>(workers_n);
        let (parked_tx, parked_rx) = bounded::<(u8, TcpStream)>(workers_n);

        let cancelled = Arc::new(AtomicBool::new(false));
        signal::install(Arc::clone(&cancelled))?;

        let workers = spawn_workers(workers_n, work_rx, WorkerContext {
            store: Arc::clone(&store),
            parked_tx,
        });

        let accept_rx = spawn_acceptor(listener);

        let accept_timeout = Duration::from_secs(self.config.server.accept_timeout_secs);
        let trigger = accept_until_trigger(&accept_rx, &work_tx, &cancelled, accept_timeout);

        if let Trigger::Barrier = trigger {
            tracing::info!(action = "lottery_time", result = "bets_received");
            run_barrier_phase(&store, &parked_rx, &work_tx, self.config.lottery.winning_number)?;
        }

        shutdown(parked_rx, work_tx, workers);
        Ok(())
    }
}

fn spawn_workers(n: usize, work_rx: Receiver<WorkItem>, ctx: WorkerContext) -> Vec<JoinHandle<()>> {
    (0..n)
        .map(|id| {
            let work_rx = work_rx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || worker::run(id, work_rx, ctx))
        })
        .collect()
}

/// Spawn the dedicated acceptor thread. `std::net::TcpListener` has no
/// built-in per-call accept timeout, so the thread blocks in
/// `accept()` forever and forwards results over an `mpsc` channel that
/// the server loop polls with a timeout instead.
fn spawn_acceptor(listener: TcpListener) -> mpsc::Receiver<std::io::Result<TcpStream>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || loop {
        let accepted = listener.accept().map(|(stream, _addr)| stream);
        if tx.send(accepted).is_err() {
            break;
        }
    });
    rx
}

fn accept_until_trigger(
    accept_rx: &mpsc::Receiver<std::io::Result<TcpStream>>,
    work_tx: &Sender<WorkItem>,
    cancelled: &Arc<AtomicBool>,
    accept_timeout: Duration,
) -> Trigger {
    let mut idle = Duration::ZERO;
    let tick = POLL_TICK.min(accept_timeout);

    loop {
        if cancelled.load(Ordering::SeqCst) {
            tracing::info!(action = "cancellation_received", result = "finishing_early");
            return Trigger::Shutdown;
        }

        match accept_rx.recv_timeout(tick) {
            Ok(Ok(conn)) => {
                tracing::info!(action = "accept_connection", result = "success");
                if work_tx.send(WorkItem::NewConn(conn)).is_err() {
                    return Trigger::Shutdown;
                }
                idle = Duration::ZERO;
            }
            Ok(Err(e)) => {
                tracing::error!(action = "accept_connection", result = "fail", error = %e);
            }
            Err(MpscTimeout::Timeout) => {
                idle += tick;
                if idle >= accept_timeout {
                    return Trigger::Barrier;
                }
            }
            Err(MpscTimeout::Disconnected) => {
                return Trigger::Shutdown;
            }
        }
    }
}

fn run_barrier_phase(
    store: &Arc<Mutex<BetStore>>,
    parked_rx: &Receiver<(u8, TcpStream)>,
    work_tx: &Sender<WorkItem>,
    winning_number: u16,
) -> Result<(), ServerError> {
    let mut agency = LotteryAgency::new(winning_number);
    {
        let guard = store.lock().expect("store mutex poisoned");
        agency.determine_winners(&guard)?;
    }
    tracing::info!(action = "determine_winners", result = "success");

    while let Ok((agency_id, conn)) = parked_rx.try_recv() {
        let winners = agency.winners_of(agency_id);
        let winner_count = winners.len();
        if work_tx.send(WorkItem::Announce(conn, agency_id, winners)).is_err() {
            tracing::warn!(action = "enqueue_announce", result = "fail", agency = agency_id);
        } else {
            tracing::debug!(
                action = "enqueue_announce",
                result = "success",
                agency = agency_id,
                winner_count
            );
        }
    }

    Ok(())
}

/// Drain any still-parked connections (closed without a winners
/// message), then stop and join every worker. Idempotent: draining an
/// already-empty queue and joining already-finished workers are both
/// no-ops.
fn shutdown(
    parked_rx: Receiver<(u8, TcpStream)>,
    work_tx: Sender<WorkItem>,
    workers: Vec<JoinHandle<()>>,
) {
    while let Ok((agency, conn)) = parked_rx.try_recv() {
        tracing::info!(action = "close_parked_connection", result = "success", agency);
        drop(conn);
    }

    for _ in 0..workers.len() {
        let _ = work_tx.send(WorkItem::Stop);
    }

    for handle in workers {
        let _ = handle.join();
    }

    tracing::info!(action = "shutdown", result = "success");
}

/// `std::net::TcpListener` has no setter for a backlog chosen after
/// `bind`; the backlog is applied by the platform at bind/listen time.
/// This hook exists so the configured value is consumed (and so a
/// future listener construction that does expose backlog control has
/// an obvious place to plug in) instead of being silently ignored.
trait ListenBacklogHint {
    fn listen_backlog_hint(&self, backlog: u32);
}

impl ListenBacklogHint for TcpListener {
    fn listen_backlog_hint(&self, backlog: u32) {
        tracing::debug!(action = "listen", result = "success", backlog);
    }
}
