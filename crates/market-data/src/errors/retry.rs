/// Classification for retry policy.
///
/// Used by the transport retry loop to decide whether a failed upstream
/// call is worth sending again.
///
/// # Behavior Summary
///
/// | Class | Resend request? | Typical cause |
/// |-------|-----------------|---------------|
/// | `Never` | No | Bad input, 4xx, upstream error envelope |
/// | `WithBackoff` | Yes, after a linear delay | Timeout, connect failure, 5xx |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request is invalid or upstream answered definitively.
    Never,

    /// Transient transport failure.
    ///
    /// The same request is sent again after `attempt × base_delay`, up to
    /// the retry budget of the calling component. Retries never span more
    /// than the single failed request.
    WithBackoff,
}
