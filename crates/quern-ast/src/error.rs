use thiserror::Error;

/// A construction-time validation error.
///
/// One variant per structural invariant. Rendering itself cannot fail; every
/// invalid shape is rejected here, when the node is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("ESCAPE is only allowed with the LIKE and ILIKE operators")]
    EscapeNotAllowed,

    #[error("CROSS JOIN cannot have an ON condition")]
    CrossJoinCondition,

    #[error("CASE requires at least one WHEN arm")]
    EmptyWhenList,

    #[error("UPDATE requires at least one assignment")]
    NoAssignments,
}
