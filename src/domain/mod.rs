//! Domain types shared by the analytics services and the snapshot store.

pub mod budget;
pub mod category;
pub mod common;
pub mod insight;
pub mod transaction;

pub use budget::{Budget, RECURRING_PERIOD_KEY};
pub use category::{OTHER_CATEGORY, OVERALL_CATEGORY};
pub use common::{Displayable, Identifiable};
pub use insight::{Insight, InsightKind};
pub use transaction::{Transaction, TransactionKind};
