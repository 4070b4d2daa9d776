//! Canonical field keys and event names for structured logging
//!
//! Every log line emitted through the logging facility macros uses these keys,
//! so log consumers can filter on them without guessing.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Tag identifiers
pub const FIELD_TAG: &str = "tag";
pub const FIELD_TAG_ID: &str = "tag_id";
pub const FIELD_SRC_TAG: &str = "src_tag";
pub const FIELD_DST_TAG: &str = "dst_tag";

// Plan and batch sizes
pub const FIELD_OP_COUNT: &str = "op_count";
pub const FIELD_BATCH_LEN: &str = "batch_len";
pub const FIELD_FAULT_COUNT: &str = "fault_count";

pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_error_fields_are_namespaced() {
        assert!(FIELD_ERR_KIND.starts_with("err."));
        assert!(FIELD_ERR_CODE.starts_with("err."));
    }
}
