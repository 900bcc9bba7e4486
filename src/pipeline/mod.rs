//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{ProcessCheck, collect_input_files, should_process, source_stem};
pub use processor::{ExportOptions, ProcessResult, process_file};
