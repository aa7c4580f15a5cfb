use std::fmt;

/// Why a run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Requested,
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("cancellation requested"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// The stage operation an error came out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOp {
    Configure,
    Initialize,
    Process,
    Release,
}

impl fmt::Display for StageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Configure => "configuration",
            Self::Initialize => "initialization",
            Self::Process => "processing",
            Self::Release => "release",
        };
        f.write_str(s)
    }
}

/// Errors raised by oracles, stages and the pipeline.
///
/// Nothing is retried internally. A `Stage` error wraps whatever a provider
/// returned together with the provider's name and the failed operation; use
/// [`Error::root`] to reach the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cancelled: {0}")]
    Cancelled(CancelReason),

    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("inconsistent oracle output: {0}")]
    Consistency(String),

    /// Recovered locally by the transliterator; never escapes a run.
    #[error("token is not a {expected} token")]
    UnsupportedToken { expected: &'static str },

    #[error("oracle error: {0}")]
    Oracle(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{op} failed in stage {stage}: {source}")]
    Stage {
        stage: String,
        op: StageOp,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn stage(stage: &str, op: StageOp, source: Error) -> Self {
        Self::Stage {
            stage: stage.to_string(),
            op,
            source: Box::new(source),
        }
    }

    /// The innermost error, with every `Stage` wrapper peeled off.
    pub fn root(&self) -> &Error {
        let mut e = self;
        while let Self::Stage { source, .. } = e {
            e = source;
        }
        e
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled(_))
    }

    pub fn is_consistency(&self) -> bool {
        matches!(self.root(), Self::Consistency(_))
    }
}
