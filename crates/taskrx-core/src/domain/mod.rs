//! Domain model (IDs, outcomes, errors).

pub mod errors;
pub mod ids;
pub mod outcome;

pub use self::errors::{RxError, TaskError, TaskStateError};
pub use self::ids::{ListenerKey, SubscriptionId};
pub use self::outcome::{OutcomeKind, TaskResult};
