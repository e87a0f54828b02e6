//! Worker pool (spec C6): a fixed number of threads draining a single
//! shared, bounded work queue.

use std::net::TcpStream;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};
use lottery_core::{Bet, ClientMessage};

use crate::store::BetStore;
use crate::work_item::WorkItem;

/// State shared by every worker: the mutex-guarded bet store and the
/// sender half of the parked-connection queue.
#[derive(Clone)]
pub struct WorkerContext {
    /// The single mutex-guarded bet store. No worker writes to it
    /// without holding this lock.
    pub store: Arc<Mutex<BetStore>>,
    /// Sender for connections parked by a `WaitingForLottery` message.
    pub parked_tx: Sender<(u8, TcpStream)>,
}

/// Run one worker's loop until it dequeues [`WorkItem::Stop`].
pub fn run(id: usize, work_rx: Receiver<WorkItem>, ctx: WorkerContext) {
    while let Ok(item) = work_rx.recv() {
        match item {
            WorkItem::Stop => break,
            WorkItem::Announce(conn, agency, winners) => handle_announce(conn, agency, &winners),
            WorkItem::NewConn(conn) => handle_new_conn(conn, &ctx),
        }
    }
    tracing::debug!(action = "worker_stop", result = "success", worker = id);
}

fn handle_announce(mut conn: TcpStream, agency: u8, winners: &[u32]) {
    let payload = lottery_core::encode_winners_payload(winners);
    match lottery_core::send_frame(&mut conn, &payload) {
        Ok(()) => {
            tracing::info!(action = "winners_announced", result = "success", agency, winners = winners.len());
        }
        Err(e) => {
            tracing::warn!(action = "winners_announced", result = "fail", agency, error = %e);
        }
    }
    // `conn` drops here, closing the connection — the last byte
    // written is always the winners message, win or lose.
}

fn handle_new_conn(mut conn: TcpStream, ctx: &WorkerContext) {
    let payload = match lottery_core::recv_frame(&mut conn) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(action = "recv_frame", result = "fail", error = %e);
            return; // `conn` drops here, closing it.
        }
    };

    let message = match ClientMessage::decode(&payload) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(action = "decode_message", result = "fail", error = %e);
            best_effort_reject(&mut conn);
            return;
        }
    };

    match message {
        ClientMessage::SubmitBets(bets) => handle_submit_bets(conn, &ctx.store, bets),
        ClientMessage::WaitingForLottery(agency) => handle_waiting_for_lottery(conn, agency, ctx),
    }
}

fn handle_submit_bets(mut conn: TcpStream, store: &Mutex<BetStore>, bets: Vec<Bet>) {
    let count = bets.len();
    let append_result = {
        let mut guard = store.lock().expect("store mutex poisoned");
        guard.append(&bets)
    };

    match append_result {
        Ok(()) => {
            tracing::info!(action = "store_bets", result = "success", count);
            if let Err(e) = send_bets_ack(&mut conn, count as i32) {
                tracing::warn!(action = "send_ack", result = "fail", error = %e);
            }
        }
        Err(e) => {
            tracing::error!(action = "store_bets", result = "fail", error = %e);
            best_effort_reject(&mut conn);
        }
    }
    // `conn` drops here, closing it.
}

fn handle_waiting_for_lottery(conn: TcpStream, agency: u8, ctx: &WorkerContext) {
    tracing::info!(action = "agency_waiting_for_lottery", result = "success", agency);
    // Ownership of `conn` transfers to the parked queue; it is NOT
    // closed here — the barrier/announce phase or shutdown will close
    // it later.
    if ctx.parked_tx.send((agency, conn)).is_err() {
        tracing::warn!(action = "park_connection", result = "fail", agency, "parked queue closed");
    }
}

fn send_bets_ack(conn: &mut TcpStream, count: i32) -> lottery_core::Result<()> {
    let payload = lottery_core::encode_bets_ack_payload(count);
    lottery_core::send_frame(conn, &payload)
}

fn best_effort_reject(conn: &mut TcpStream) {
    let _ = send_bets_ack(conn, -1);
}
