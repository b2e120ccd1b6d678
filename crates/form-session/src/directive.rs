//! How a data mutation affects taint.

use form_core::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaintDirective {
    /// Mark every changed field as touched.
    #[default]
    Taint,
    /// Clear the taint of changed fields that were touched before. Fields
    /// never touched are left alone.
    Untaint,
    /// Drop all taint.
    UntaintAll,
    /// Leave taint alone and skip validation. Used when authoritative data
    /// replaces the form and must not look user-edited.
    Ignore,
    /// Taint exactly these fields, whatever changed.
    Fields(Vec<Path>),
}
