use std::fmt;

/// How the pipeline should proceed after an interceptor ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Action {
    /// Hand the request to the next stage.
    #[default]
    Continue,
    /// Park the request (long-poll / streaming).
    Suspend,
    /// Resume a previously suspended request.
    Resume,
    /// Stop processing and release the request.
    Cancel,
    /// Skip the remaining interceptors but still dispatch the request.
    Skip,
}

impl Action {
    pub fn is_continue(self) -> bool {
        self == Self::Continue
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
