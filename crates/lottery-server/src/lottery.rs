//! Lottery agency (spec C5): aggregates, per-agency, the documents of
//! bets whose number matches the configured winning number.

use std::collections::{HashMap, HashSet};

use crate::error::StoreError;
use crate::store::BetStore;

/// Aggregates winning documents per agency.
pub struct LotteryAgency {
    winning_number: u16,
    winners: HashMap<u8, HashSet<u32>>,
}

impl LotteryAgency {
    /// Construct an agency with no winners determined yet.
    pub fn new(winning_number: u16) -> Self {
        Self {
            winning_number,
            winners: HashMap::new(),
        }
    }

    /// Iterate the store once, recording every winning document under
    /// its agency. Idempotent against duplicate stored bets: the
    /// per-agency collection is a set.
    pub fn determine_winners(&mut self, store: &BetStore) -> Result<(), StoreError> {
        self.winners.clear();
        for bet in store.load()? {
            let bet = bet?;
            if bet.has_won(self.winning_number) {
                self.winners.entry(bet.agency).or_default().insert(bet.document);
            }
        }
        Ok(())
    }

    /// The winning documents for `agency`, in unspecified order.
    pub fn winners_of(&self, agency: u8) -> Vec<u32> {
        self.winners
            .get(&agency)
            .map(|docs| docs.iter().copied().collect())
            .unwrap_or_default()
    }
}
