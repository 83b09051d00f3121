pub mod builder;
pub mod format;

pub use builder::{build_report, BatchReport, DeltaRecord};
pub use format::{join_sections, render_section, Locale};
