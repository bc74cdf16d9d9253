/// Errors produced while planning or evaluating a π computation.
#[derive(Debug, thiserror::Error)]
pub enum PiError {
    /// The requested digit count was zero.
    #[error("digit count must be at least 1, got {0}")]
    InvalidDigits(u64),

    /// The working precision for the requested digits exceeds what the
    /// big-float type can represent.
    #[error("{digits} digits need {bits} bits of precision, maximum is {max}")]
    PrecisionOverflow { digits: u64, bits: u64, max: u32 },

    /// A series index whose factorial arguments no longer fit the integer type.
    #[error("series index {0} is out of range")]
    TermIndexOverflow(u32),

    /// The estimated footprint exceeds the configured memory limit.
    #[error("computation needs about {needed} bytes, limit is {limit} bytes")]
    MemoryLimit { needed: usize, limit: usize },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
