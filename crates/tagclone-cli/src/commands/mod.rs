pub mod clone_tag;
pub mod seed;

use std::process::ExitCode;

use tagclone_core::ExError;

/// How a command finished, mapped onto the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// Lookup or remote failure, including per-operation faults
    Failure,
    /// Bad arguments, lock or permission problems
    Usage,
}

impl Status {
    pub fn from_error(err: &ExError) -> Self {
        if err.kind().is_usage() {
            Status::Usage
        } else {
            Status::Failure
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::from(1),
            Status::Usage => ExitCode::from(2),
        }
    }
}
