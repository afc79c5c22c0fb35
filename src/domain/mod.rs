//! Data structures for the report pipeline.

pub mod request;
pub mod summary;
pub mod transaction;

pub use request::{ReportRequest, RequestPayload, ValidationError};
pub use summary::{summarize, Direction, SummaryRow};
pub use transaction::{RawTransaction, TxInput, TxOutput};
