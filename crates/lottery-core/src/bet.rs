//! The `Bet` record: a single lottery registration submitted by an agency.

use chrono::NaiveDate;

/// Maximum length, in bytes, of a UTF-8 first/last name field on the wire.
pub const MAX_NAME_LEN: usize = 255;

/// A single lottery bet, as reconstructed from the wire codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bet {
    /// Agency that submitted this bet.
    pub agency: u8,
    /// First name, UTF-8, at most [`MAX_NAME_LEN`] bytes.
    pub first_name: String,
    /// Last name, UTF-8, at most [`MAX_NAME_LEN`] bytes.
    pub last_name: String,
    /// National ID number.
    pub document: u32,
    /// Birthdate, stored as a calendar date.
    pub birthdate: NaiveDate,
    /// The agency's lottery pick.
    pub number: u16,
}

impl Bet {
    /// `true` if this bet matches `winning_number`.
    #[inline]
    pub fn has_won(&self, winning_number: u16) -> bool {
        self.number == winning_number
    }
}
