use serde::{Deserialize, Serialize};
use tagclone_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using the structured `ExError`
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code usable in tests and by callers that need
/// to branch on the failure class (the CLI maps kinds to exit statuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Usage / validation
    InvalidInput,
    Locked,
    Forbidden,

    // Lookup
    NotFound,
    AlreadyExists,

    // Remote
    /// A single call inside a batch was rejected
    RemoteFault,
    /// A whole batch could not be delivered or its response was malformed
    Transport,

    // Integration
    Io,
    Serialization,
    Persistence,

    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Locked => "ERR_LOCKED",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::RemoteFault => "ERR_REMOTE_FAULT",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is a usage/validation failure detected before any mutation
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput | ExErrorKind::Locked | ExErrorKind::Forbidden
        )
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    tag: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            tag: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the tag (name or id) the failure concerns
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, " (tag: {})", tag)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failures of a clone run detected by the tagclone domain logic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Source and destination tags must be different: {tag}")]
    SameTag { tag: String },

    #[error("batch size must not be negative (got {size})")]
    NegativeBatchSize { size: i64 },

    #[error("reconciling builds requires reconciling packages as well")]
    BuildsWithoutPackages,

    #[error("This action requires tag or admin privileges")]
    PermissionDenied,

    #[error("No such tag: {tag}")]
    TagNotFound { tag: String },

    #[error("Destination tag {tag} does not exist and copying the configuration was not requested")]
    DestinationMissing { tag: String },

    #[error("Tag {tag} is locked; force is required to clone from or to it")]
    TagLocked { tag: String },

    #[error("No event matches {selector}")]
    EventNotFound { selector: String },

    #[error("Batch of {len} call(s) could not be delivered: {reason}")]
    Transport { len: usize, reason: String },
}

impl From<SyncError> for ExError {
    fn from(err: SyncError) -> Self {
        let message = err.to_string();
        match err {
            SyncError::SameTag { tag } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate")
                .with_tag(tag)
                .with_message(message),

            SyncError::NegativeBatchSize { .. } | SyncError::BuildsWithoutPackages => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("validate")
                    .with_message(message)
            }

            SyncError::PermissionDenied => ExError::new(ExErrorKind::Forbidden)
                .with_op("check_permissions")
                .with_message(message),

            SyncError::TagNotFound { tag } => ExError::new(ExErrorKind::NotFound)
                .with_op("get_tag")
                .with_tag(tag)
                .with_message(message),

            SyncError::DestinationMissing { tag } => ExError::new(ExErrorKind::NotFound)
                .with_op("fetch_or_create_dest")
                .with_tag(tag)
                .with_message(message),

            SyncError::TagLocked { tag } => ExError::new(ExErrorKind::Locked)
                .with_op("check_locks")
                .with_tag(tag)
                .with_message(message),

            SyncError::EventNotFound { .. } => ExError::new(ExErrorKind::NotFound)
                .with_op("resolve_event")
                .with_message(message),

            SyncError::Transport { .. } => ExError::new(ExErrorKind::Transport)
                .with_op("submit_batch")
                .with_message(message),
        }
    }
}

/// A single call rejected by the hub inside an otherwise delivered batch
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("fault {code}: {message}")]
pub struct RemoteFault {
    pub code: i32,
    pub message: String,
}

impl RemoteFault {
    pub const GENERIC: i32 = 1000;
    pub const LOCKED: i32 = 1001;
    pub const NOT_FOUND: i32 = 1002;
    pub const CONFLICT: i32 = 1003;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<RemoteFault> for ExError {
    fn from(fault: RemoteFault) -> Self {
        ExError::new(ExErrorKind::RemoteFault)
            .with_op("call")
            .with_message(fault.to_string())
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
