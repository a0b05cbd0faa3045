use thiserror::Error;

/// Error reported by a builder's terminal `build()` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A node invariant was violated while materializing the tree.
    #[error(transparent)]
    Node(#[from] quern_ast::Error),

    #[error("select list is required, call columns() before build()")]
    MissingSelectList,

    #[error("table is required, call from() before build()")]
    MissingTable,

    #[error("cannot join without a from() table")]
    JoinBeforeFrom,
}
