use core::fmt;

/// Precondition violations reported by tree operations.
///
/// Finding an equal element on insertion is not an error, it is reported
/// through the `Ok` value of [insert](crate::OrderedTree::insert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// The `Ptr` does not point to a live element of the arena
    InvalidPtr,
    /// The element is already linked into a tree
    AlreadyLinked,
    /// The element is not linked into any tree
    NotLinked,
    /// The element is linked into a different tree
    NotMember,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TreeError::InvalidPtr => "invalid `Ptr`",
            TreeError::AlreadyLinked => "element is already linked into a tree",
            TreeError::NotLinked => "element is not linked into a tree",
            TreeError::NotMember => "element is linked into a different tree",
        };
        f.write_str(s)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TreeError {}
