pub mod config;
pub mod dispatch;
pub mod error;
pub mod mailbox;
pub mod protocol;
pub mod status;

pub use dispatch::{CommandOutcome, Dispatch};
pub use error::{DispatchError, Result};
pub use mailbox::{ActionMailbox, PendingAction};
pub use status::{StatusSnapshot, StatusStore, Target};
