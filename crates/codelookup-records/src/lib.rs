//! Patient assessments and care plans that search results feed into.

pub mod assessment;
pub mod care_plan;
pub mod store;

pub use assessment::{Assessment, SelectedCode, SelectedCodes};
pub use care_plan::{CarePlan, CarePlanTask};
pub use store::{InMemoryRecordStore, RecordStore};
