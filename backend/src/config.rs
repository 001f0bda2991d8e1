use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = ".";
pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// What happens when one concept scheme cannot be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing scheme. Files already written are kept.
    #[default]
    Abort,
    /// Log the failure, convert the remaining schemes, report at the end.
    KeepGoing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Directory holding the single `.xml` input file
    pub input_dir: PathBuf,
    /// Directory receiving the `.ttl` files, created if missing
    pub output_dir: PathBuf,
    pub failure_policy: FailurePolicy,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ConversionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.input_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
