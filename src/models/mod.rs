pub mod study_record;

pub use study_record::{StudyInput, StudyRecord};
