use std::fmt;

pub type GraphResult<T> = Result<T, GraphErr>;

/// Invalid input to one of the graph operations: a self-loop, a duplicate
/// edge, an index out of range, a disconnected graph where a connected one
/// is required, or a SEFE instance whose shared subgraph is not
/// biconnected. "Not planar" and "no SEFE" are *not* errors; the embedders
/// report those as absent results.
pub struct GraphErr {
    message: String,
}

impl GraphErr {
    pub fn new(message: &str) -> GraphErr {
        GraphErr {
            message: message.to_string(),
        }
    }

    /// The error already wrapped in `Err`, for early returns.
    pub fn new_err<T>(message: &str) -> GraphResult<T> {
        Err(GraphErr::new(message))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for GraphErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for GraphErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {}", self.message)
    }
}
