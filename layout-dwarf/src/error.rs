use thiserror::Error;

/// Fatal resolver failures. `NotFound` is deliberately absent here:
/// a route whose head type has no debug-info entries at all is a
/// non-fatal, route-level outcome (see [`crate::resolver::RouteOutcome`]),
/// never an `Err`.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("type {head:?} has debug-info entries but none are actionable (all declarations or childless)")]
    ResolutionFailed { head: String },

    #[error("field {field:?} not found on {parent:?}")]
    FieldNotFound { field: String, parent: String },

    #[error("member {field:?} of {parent:?} is not a composite type")]
    NotComposite { field: String, parent: String },

    #[error("static member {field:?} of {parent:?} has no linkage name")]
    LinkageNameMissing { field: String, parent: String },

    #[error("symbol {symbol:?} (linkage name of {field:?}) not found in symbol table")]
    SymbolNotFound { field: String, symbol: String },

    /// Modeled for taxonomy completeness. Every destination the
    /// resolver writes through is a `&mut i64` already proven settable
    /// by the borrow checker at construction time, so this variant is
    /// never actually returned by this crate's resolver.
    #[error("destination for {field:?} is not settable")]
    DestinationNotSettable { field: String },

    #[error("failed to read debug info")]
    DebugInfo(#[from] gimli::Error),

    #[error("failed to read object file")]
    Object(#[from] object::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
