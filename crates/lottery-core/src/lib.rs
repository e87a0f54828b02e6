//! Wire protocol, bet data model, and framed transport shared between
//! the lottery agency server's workers and server loop.

mod bet;
mod codec;
mod error;
mod message;
mod transport;

pub use bet::{Bet, MAX_NAME_LEN};
pub use codec::{decode_bet, encode_bet, encode_bets_ack_payload, encode_winners_payload};
pub use error::{ProtocolError, Result};
pub use message::ClientMessage;
pub use transport::{recv_frame, send_all, send_frame};
