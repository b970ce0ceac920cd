#[macro_use]
extern crate log;

mod store;
pub use store::{RecordStore, StoreError};

mod query;
pub use query::find_by_date;
