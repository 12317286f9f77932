use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

/// The ways a map operation can refuse a request.
///
/// Every operation returning one of these has a `try_` sibling returning a
/// `bool` or an `Option` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `add` was called with a key already present in the map.
    #[error("key already exists")]
    DuplicateKey,
    /// `get` was called with a key that is not in the map.
    #[error("key not found")]
    KeyNotFound,
    /// A positional lookup asked for an entry past the end of the map.
    #[error("index {index} is out of range for a map of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    /// `min_key`/`max_key` was called on an empty map.
    #[error("the map is empty")]
    EmptyCollection,
}

/// A broken red-black invariant, as reported by `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("the root is red")]
    RedRoot,
    #[error("a red node has a red child")]
    RedRed,
    #[error("two leaf paths cross a different number of black nodes")]
    BlackHeight,
    #[error("keys are not strictly increasing in order")]
    Order,
    #[error("a child does not point back to its parent")]
    Parent,
    #[error("the map reports {expected} entries but {found} are reachable")]
    Count { expected: usize, found: usize },
}
