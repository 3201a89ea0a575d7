//! Command execution result types.

/// What the loop should do after a handler returns successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// End the session, printing the message if there is one.
    Exit(Option<String>),
}

impl Flow {
    /// End the session with a farewell message.
    pub fn exit(message: impl Into<String>) -> Self {
        Self::Exit(Some(message.into()))
    }

    /// End the session without printing anything.
    pub fn quiet_exit() -> Self {
        Self::Exit(None)
    }
}

/// Result of executing one parsed line.
#[derive(Debug)]
pub enum Outcome {
    /// Handler ran and asked to continue.
    Completed,
    /// Handler asked to end the session.
    Exit(Option<String>),
    /// The line never reached a handler.
    Rejected(crate::core::error::DispatchError),
    /// The handler returned an error or panicked.
    Failed(anyhow::Error),
}

impl Outcome {
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit(_))
    }
}

impl From<Flow> for Outcome {
    fn from(flow: Flow) -> Self {
        match flow {
            Flow::Continue => Self::Completed,
            Flow::Exit(message) => Self::Exit(message),
        }
    }
}
