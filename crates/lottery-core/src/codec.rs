//! Binary layout for a single [`Bet`] and for the server's reply payloads.
//!
//! Numeric fields are little-endian; string fields are prefixed by a
//! single length byte (so no endianness applies to it).

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::NaiveDate;

use crate::bet::{Bet, MAX_NAME_LEN};
use crate::error::{ProtocolError, Result};

const BIRTHDATE_FMT: &str = "%Y-%m-%d";

fn read_string_field(cursor: &mut &[u8], field: &str) -> Result<String> {
    let len = cursor
        .read_u8()
        .map_err(|_| ProtocolError::MalformedBet(format!("truncated {field} length")))? as usize;

    if cursor.len() < len {
        return Err(ProtocolError::MalformedBet(format!(
            "{field} length {len} exceeds remaining {} bytes",
            cursor.len()
        )));
    }

    let mut buf = vec![0u8; len];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| ProtocolError::MalformedBet(format!("truncated {field} bytes")))?;

    String::from_utf8(buf).map_err(|_| ProtocolError::MalformedBet(format!("invalid UTF-8 in {field}")))
}

fn write_string_field(buf: &mut Vec<u8>, value: &str, field: &str) -> Result<()> {
    if value.len() > MAX_NAME_LEN {
        return Err(ProtocolError::MalformedBet(format!(
            "{field} exceeds {MAX_NAME_LEN} bytes"
        )));
    }
    buf.write_u8(value.len() as u8)
        .expect("writing to a Vec<u8> never fails");
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Decode a single bet from its wire layout (see `spec` §4.2).
///
/// Fails with [`ProtocolError::MalformedBet`] if the buffer is
/// truncated mid-field, a string length overruns the remaining bytes,
/// UTF-8 is invalid, or the birthdate does not parse.
pub fn decode_bet(data: &[u8]) -> Result<Bet> {
    let mut cursor = data;

    let agency = cursor
        .read_u8()
        .map_err(|_| ProtocolError::MalformedBet("truncated agency field".into()))?;

    let first_name = read_string_field(&mut cursor, "first_name")?;
    let last_name = read_string_field(&mut cursor, "last_name")?;

    let document = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| ProtocolError::MalformedBet("truncated document field".into()))?;

    let birthdate_str = read_string_field(&mut cursor, "birthdate")?;
    let birthdate = NaiveDate::parse_from_str(&birthdate_str, BIRTHDATE_FMT)
        .map_err(|e| ProtocolError::MalformedBet(format!("invalid birthdate: {e}")))?;

    let number = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| ProtocolError::MalformedBet("truncated number field".into()))?;

    Ok(Bet {
        agency,
        first_name,
        last_name,
        document,
        birthdate,
        number,
    })
}

/// Encode a single bet to its wire layout. Inverse of [`decode_bet`].
pub fn encode_bet(bet: &Bet) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.write_u8(bet.agency).expect("writing to a Vec<u8> never fails");
    write_string_field(&mut buf, &bet.first_name, "first_name")?;
    write_string_field(&mut buf, &bet.last_name, "last_name")?;
    buf.write_u32::<LittleEndian>(bet.document)
        .expect("writing to a Vec<u8> never fails");
    write_string_field(&mut buf, &bet.birthdate.format(BIRTHDATE_FMT).to_string(), "birthdate")?;
    buf.write_u16::<LittleEndian>(bet.number)
        .expect("writing to a Vec<u8> never fails");
    Ok(buf)
}

/// Build the payload for a `BetsAck` reply: `uint16 LE count`, where a
/// negative `count` (rejection) is encoded as `0xFFFF`.
pub fn encode_bets_ack_payload(count: i32) -> Vec<u8> {
    let encoded: u16 = if count < 0 { 0xFFFF } else { count as u16 };
    let mut buf = Vec::with_capacity(2);
    buf.write_u16::<LittleEndian>(encoded)
        .expect("writing to a Vec<u8> never fails");
    buf
}

/// Build the inner payload for a `WinnersMsg` reply:
/// `uint16 LE count || count * uint32 LE document`.
pub fn encode_winners_payload(documents: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + 4 * documents.len());
    buf.write_u16::<LittleEndian>(documents.len() as u16)
        .expect("writing to a Vec<u8> never fails");
    for doc in documents {
        buf.write_u32::<LittleEndian>(*doc)
            .expect("writing to a Vec<u8> never fails");
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bet() -> Bet {
        Bet {
            agency: 1,
            first_name: "John".into(),
            last_name: "Pork".into(),
            document: 123_456_789,
            birthdate: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            number: 7574,
        }
    }

    #[test]
    fn round_trip() {
        let bet = sample_bet();
        let encoded = encode_bet(&bet).unwrap();
        let decoded = decode_bet(&encoded).unwrap();
        assert_eq!(bet, decoded);
    }

    #[test]
    fn round_trip_max_length_names() {
        let mut bet = sample_bet();
        bet.first_name = "a".repeat(MAX_NAME_LEN);
        bet.last_name = "b".repeat(MAX_NAME_LEN);
        let encoded = encode_bet(&bet).unwrap();
        let decoded = decode_bet(&encoded).unwrap();
        assert_eq!(bet, decoded);
    }

    #[test]
    fn rejects_truncated_buffer() {
        let bet = sample_bet();
        let encoded = encode_bet(&bet).unwrap();
        let truncated = &encoded[..encoded.len() - 3];
        assert!(decode_bet(truncated).is_err());
    }

    #[test]
    fn rejects_invalid_birthdate() {
        let mut buf = Vec::new();
        buf.write_u8(1).unwrap();
        write_string_field(&mut buf, "John", "first_name").unwrap();
        write_string_field(&mut buf, "Pork", "last_name").unwrap();
        buf.write_u32::<LittleEndian>(1).unwrap();
        write_string_field(&mut buf, "not-a-date", "birthdate").unwrap();
        buf.write_u16::<LittleEndian>(1).unwrap();

        assert!(decode_bet(&buf).is_err());
    }

    #[test]
    fn bets_ack_rejection_is_0xffff() {
        assert_eq!(encode_bets_ack_payload(-1), vec![0xFF, 0xFF]);
        assert_eq!(encode_bets_ack_payload(2), vec![0x02, 0x00]);
    }

    #[test]
    fn winners_payload_layout() {
        let payload = encode_winners_payload(&[1001, 1002]);
        assert_eq!(
            payload,
            vec![0x02, 0x00, 0xE9, 0x03, 0x00, 0x00, 0xEA, 0x03, 0x00, 0x00]
        );
    }

    #[test]
    fn winners_payload_empty() {
        assert_eq!(encode_winners_payload(&[]), vec![0x00, 0x00]);
    }
}
