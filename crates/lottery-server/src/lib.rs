//! Lottery agency server: the concurrent components described by the
//! system's central-server side (C5–C8).

mod error;
mod lottery;
mod server;
mod signal;
mod store;
mod work_item;
mod worker;

pub use error::{ServerError, StoreError};
pub use lottery::LotteryAgency;
pub use server::LotteryServer;
pub use store::BetStore;
