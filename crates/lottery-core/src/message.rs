//! Classifies a decoded frame payload as a bet submission or a
//! "waiting for lottery" notice. Pure: no I/O, no shared state.

use byteorder::ReadBytesExt;

use crate::bet::Bet;
use crate::codec::decode_bet;
use crate::error::{ProtocolError, Result};

/// A classified client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// One or more bets to persist.
    SubmitBets(Vec<Bet>),
    /// The named agency has no more bets and is waiting for the lottery.
    WaitingForLottery(u8),
}

impl ClientMessage {
    /// Classify and decode a frame payload.
    ///
    /// `payload.len() == 1` is a `WaitingForLottery(agency)` notice;
    /// `payload.len() > 1` is a sequence of `<uint8 bet_len, bet_len
    /// bytes>` records covering the payload exactly; `payload.len() ==
    /// 0` is always rejected.
    pub fn decode(payload: &[u8]) -> Result<ClientMessage> {
        match payload.len() {
            0 => Err(ProtocolError::MalformedBatch("empty payload".into())),
            1 => Ok(ClientMessage::WaitingForLottery(payload[0])),
            _ => decode_bets_batch(payload).map(ClientMessage::SubmitBets),
        }
    }
}

fn decode_bets_batch(payload: &[u8]) -> Result<Vec<Bet>> {
    let mut cursor: &[u8] = payload;
    let mut bets = Vec::new();

    while !cursor.is_empty() {
        let bet_len = cursor
            .read_u8()
            .map_err(|_| ProtocolError::MalformedBatch("truncated bet length".into()))?
            as usize;

        if bet_len == 0 {
            return Err(ProtocolError::MalformedBatch("zero-length bet record".into()));
        }
        if bet_len > cursor.len() {
            return Err(ProtocolError::MalformedBatch(format!(
                "bet length {bet_len} exceeds remaining {} bytes",
                cursor.len()
            )));
        }

        let (bet_bytes, rest) = cursor.split_at(bet_len);
        bets.push(decode_bet(bet_bytes).map_err(|e| {
            ProtocolError::MalformedBatch(format!("bet record failed to decode: {e}"))
        })?);
        cursor = rest;
    }

    Ok(bets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_bet;
    use chrono::NaiveDate;
    use byteorder::WriteBytesExt;

    fn sample_bet(document: u32, number: u16) -> Bet {
        Bet {
            agency: 1,
            first_name: "John".into(),
            last_name: "Pork".into(),
            document,
            birthdate: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            number,
        }
    }

    fn frame_one_bet(bet: &Bet) -> Vec<u8> {
        let encoded = encode_bet(bet).unwrap();
        let mut payload = Vec::new();
        payload.write_u8(encoded.len() as u8).unwrap();
        payload.extend_from_slice(&encoded);
        payload
    }

    #[test]
    fn empty_payload_is_malformed() {
        assert!(matches!(
            ClientMessage::decode(&[]),
            Err(ProtocolError::MalformedBatch(_))
        ));
    }

    #[test]
    fn single_byte_is_waiting_for_lottery() {
        assert_eq!(
            ClientMessage::decode(&[3]).unwrap(),
            ClientMessage::WaitingForLottery(3)
        );
    }

    #[test]
    fn single_byte_zero_parks_agency_zero() {
        assert_eq!(
            ClientMessage::decode(&[0]).unwrap(),
            ClientMessage::WaitingForLottery(0)
        );
    }

    #[test]
    fn multi_byte_is_submit_bets() {
        let bet = sample_bet(123_456_789, 7574);
        let payload = frame_one_bet(&bet);
        match ClientMessage::decode(&payload).unwrap() {
            ClientMessage::SubmitBets(bets) => assert_eq!(bets, vec![bet]),
            other => panic!("expected SubmitBets, got {other:?}"),
        }
    }

    #[test]
    fn two_bets_in_one_batch() {
        let a = sample_bet(1001, 7574);
        let b = sample_bet(1002, 7574);
        let mut payload = frame_one_bet(&a);
        payload.extend(frame_one_bet(&b));

        match ClientMessage::decode(&payload).unwrap() {
            ClientMessage::SubmitBets(bets) => assert_eq!(bets, vec![a, b]),
            other => panic!("expected SubmitBets, got {other:?}"),
        }
    }

    #[test]
    fn bet_len_exceeding_remaining_bytes_is_malformed() {
        let payload = vec![3u8, 0x00, 0x00];
        assert!(matches!(
            ClientMessage::decode(&payload),
            Err(ProtocolError::MalformedBatch(_))
        ));
    }

    #[test]
    fn zero_length_bet_record_is_malformed() {
        let payload = vec![0u8, 1u8];
        assert!(matches!(
            ClientMessage::decode(&payload),
            Err(ProtocolError::MalformedBatch(_))
        ));
    }
}
