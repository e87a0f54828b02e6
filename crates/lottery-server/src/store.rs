//! Append-only CSV bet store (spec C4).
//!
//! `append` writes each bet as one CSV row and flushes before
//! returning; callers must hold the surrounding store mutex. `load`
//! opens an independent reader over the same path on every call,
//! giving a restartable, forward-only sequence.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lottery_core::Bet;

use crate::error::StoreError;

const BIRTHDATE_FMT: &str = "%Y-%m-%d";

/// Append-only, persistent log of submitted bets.
pub struct BetStore {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl BetStore {
    /// Open (creating if necessary) the CSV file at `path` in append
    /// mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        Ok(Self { path, writer })
    }

    /// Append `bets` atomically relative to external readers that read
    /// to EOF: every row is written and the file is flushed before
    /// this call returns.
    pub fn append(&mut self, bets: &[Bet]) -> Result<(), StoreError> {
        for bet in bets {
            self.writer.write_record(&[
                bet.agency.to_string(),
                bet.first_name.clone(),
                bet.last_name.clone(),
                bet.document.to_string(),
                bet.birthdate.format(BIRTHDATE_FMT).to_string(),
                bet.number.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Read every bet persisted so far, from the beginning of the file.
    pub fn load(&self) -> Result<BetIter, StoreError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        Ok(BetIter {
            records: reader.into_records(),
        })
    }
}

/// Lazy, forward-only iterator over the persisted bets.
pub struct BetIter {
    records: csv::StringRecordsIntoIter<File>,
}

impl Iterator for BetIter {
    type Item = Result<Bet, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(StoreError::Csv(e))),
        };
        Some(parse_record(&record))
    }
}

fn parse_record(record: &csv::StringRecord) -> Result<Bet, StoreError> {
    let field = |index: usize, name: &str| -> Result<&str, StoreError> {
        record
            .get(index)
            .ok_or_else(|| StoreError::CorruptRecord(format!("missing field {name}")))
    };

    let agency: u8 = field(0, "agency")?
        .parse()
        .map_err(|_| StoreError::CorruptRecord("agency is not a u8".into()))?;
    let first_name = field(1, "first_name")?.to_string();
    let last_name = field(2, "last_name")?.to_string();
    let document: u32 = field(3, "document")?
        .parse()
        .map_err(|_| StoreError::CorruptRecord("document is not a u32".into()))?;
    let birthdate = NaiveDate::parse_from_str(field(4, "birthdate")?, BIRTHDATE_FMT)
        .map_err(|e| StoreError::CorruptRecord(format!("bad birthdate: {e}")))?;
    let number: u16 = field(5, "number")?
        .parse()
        .map_err(|_| StoreError::CorruptRecord("number is not a u16".into()))?;

    Ok(Bet {
        agency,
        first_name,
        last_name,
        document,
        birthdate,
        number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bet(agency: u8, document: u32, number: u16) -> Bet {
        Bet {
            agency,
            first_name: "John".into(),
            last_name: "Pork".into(),
            document,
            birthdate: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            number,
        }
    }

    #[test]
    fn append_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.csv");
        let mut store = BetStore::open(&path).unwrap();

        let bets = vec![sample_bet(1, 1001, 7574), sample_bet(1, 1002, 1)];
        store.append(&bets).unwrap();

        let loaded: Vec<Bet> = store.load().unwrap().map(Result::unwrap).collect();
        assert_eq!(loaded, bets);
    }

    #[test]
    fn load_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.csv");
        let mut store = BetStore::open(&path).unwrap();
        store.append(&[sample_bet(2, 2001, 7574)]).unwrap();

        let first_pass: Vec<Bet> = store.load().unwrap().map(Result::unwrap).collect();
        let second_pass: Vec<Bet> = store.load().unwrap().map(Result::unwrap).collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn two_appends_are_both_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.csv");
        let mut store = BetStore::open(&path).unwrap();

        store.append(&[sample_bet(3, 3001, 7574)]).unwrap();
        store.append(&[sample_bet(3, 3002, 7574)]).unwrap();

        let loaded: Vec<Bet> = store.load().unwrap().map(Result::unwrap).collect();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn reopening_an_existing_file_preserves_prior_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bets.csv");

        let mut store = BetStore::open(&path).unwrap();
        store.append(&[sample_bet(4, 4001, 1)]).unwrap();
        drop(store);

        let store = BetStore::open(&path).unwrap();
        let loaded: Vec<Bet> = store.load().unwrap().map(Result::unwrap).collect();
        assert_eq!(loaded.len(), 1);
    }
}
