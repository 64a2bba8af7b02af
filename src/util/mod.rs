pub mod clock;
pub mod status;

pub use clock::{Timestamp, now, next_timestamp};
pub use status::{Code, Result, Status};
