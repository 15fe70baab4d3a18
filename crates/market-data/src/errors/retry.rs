/// Classification for retry policy.
///
/// Used by the source client to decide what to do after a failed request.
///
/// # Behavior Summary
///
/// | Class | Retry? | Enter cooldown? |
/// |-------|--------|-----------------|
/// | `Never` | No | No |
/// | `WithBackoff` | Yes, until the retry budget is spent | No |
/// | `Cooldown` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - malformed payload, missing data or terminal failure.
    /// Retrying the same request won't help.
    Never,

    /// Retry with linearly increasing backoff.
    ///
    /// Used for transient errors like timeouts, connection resets and 5xx
    /// responses. Once the retry budget is spent the symbols of the request
    /// are treated as lost for this cycle.
    WithBackoff,

    /// The upstream signalled rate limiting (HTTP 429).
    ///
    /// The source is suspended for its cooldown window instead of being
    /// retried, so a throttled upstream never sees a retry storm.
    Cooldown,
}
