//! Serializer options.
//!
//! Defaults are an explicit value captured at [`Serializer`] construction
//! and replaced wholesale by `set_default_options`; there is no hidden
//! process-wide state. A per-call options value is complete -- callers
//! wanting to override a single field clone the serializer's defaults and
//! mutate the clone.
//!
//! [`Serializer`]: crate::Serializer

use time::UtcOffset;

/// How the generator encodes a full embedded resource found in a
/// relationship slot. Exactly one policy applies per call, which removes
/// the ambiguity of three independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddedResourcePolicy {
    /// An embedded resource in a relationship slot is a validation
    /// violation.
    #[default]
    Reject,
    /// Downgrade to a `namespace.Type#identifier` reference string,
    /// discarding the embedded body.
    ConvertToReference,
    /// Keep the full embedded object.
    Embed,
    /// Emit the bare identifier with no namespace or type qualification.
    BareId,
}

/// Options for one `to_json` / `from_json` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializerOptions {
    /// Run the validation pass before generation / after population.
    pub validate: bool,
    /// Use the legacy ergo wire envelope.
    pub ergo: bool,
    /// UTC offset, in minutes, used to normalize date/time values on
    /// output and to anchor unqualified date/time strings on input.
    pub utc_offset_minutes: i32,
    /// Encoding for embedded resources in relationship slots (output side).
    pub embedded_resources: EmbeddedResourcePolicy,
    /// Assign `$id` to each resource and serialize repeated identities as
    /// short references (output side).
    pub deduplicate_resources: bool,
    /// Accept embedded objects in relationship slots (input side).
    pub accept_resources_for_relationships: bool,
    /// Reject date/time strings lacking an explicit zone qualifier
    /// (input side).
    pub strict_qualified_date_times: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        SerializerOptions {
            validate: true,
            ergo: false,
            utc_offset_minutes: local_utc_offset_minutes(),
            embedded_resources: EmbeddedResourcePolicy::default(),
            deduplicate_resources: false,
            accept_resources_for_relationships: false,
            strict_qualified_date_times: false,
        }
    }
}

/// The process-local UTC offset in minutes, or 0 when it cannot be
/// determined (e.g. in multi-threaded environments on some platforms).
pub fn local_utc_offset_minutes() -> i32 {
    UtcOffset::current_local_offset()
        .map(|offset| i32::from(offset.whole_minutes()))
        .unwrap_or(0)
}
