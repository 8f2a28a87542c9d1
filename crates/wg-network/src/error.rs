//! Network-specific error types.

/// Network construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// A node has more than one uptree branch.
    MultipleUptree { node: String },

    /// A branch connects a node to itself.
    SelfLoop { node: String },

    /// The same branch was declared twice.
    DuplicateBranch { uptree: String, downtree: String },

    /// A root node (no uptree branch) has no terminal pressure.
    RootWithoutPressure { node: String },

    /// A non-empty network has no root node.
    NoRoot,

    /// A node cannot be reached from any root (the branches form a cycle).
    Unreachable { node: String },
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::MultipleUptree { node } => {
                write!(f, "Network node {} has more than one uptree branch", node)
            }
            NetworkError::SelfLoop { node } => {
                write!(f, "Network branch connects node {} to itself", node)
            }
            NetworkError::DuplicateBranch { uptree, downtree } => {
                write!(f, "Network branch {} -> {} declared twice", uptree, downtree)
            }
            NetworkError::RootWithoutPressure { node } => {
                write!(f, "Network root {} has no terminal pressure", node)
            }
            NetworkError::NoRoot => write!(f, "Network has nodes but no root"),
            NetworkError::Unreachable { node } => {
                write!(f, "Network node {} is not reachable from any root", node)
            }
        }
    }
}

impl std::error::Error for NetworkError {}
