mod format;
mod generate;

pub use format::{GoFormatter, NoopFormatter, SourceFormatter};
pub use generate::{generate_project, GenerateOptions, GeneratedProject, ENTRY_FILE};
