use crate::common::*;

/// Bounded retry with exponential backoff for transient I/O failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// The total number of attempts, including the first one.
    pub max_attempts: NonZeroUsize,
    /// The delay after the first failure in milliseconds.
    pub initial_delay_ms: u64,
    /// The upper bound of the delay in milliseconds.
    pub max_delay_ms: u64,
    /// The factor applied to the delay after each failure.
    pub backoff: R64,
}

impl RetryPolicy {
    /// Policy for reading raw annotation files: a few attempts, fixed short delay.
    pub fn read_default() -> Self {
        Self::fixed(3, Duration::from_millis(100))
    }

    /// Policy for writing cache files.
    pub fn write_default() -> Self {
        Self {
            max_attempts: NonZeroUsize::new(5).unwrap(),
            initial_delay_ms: 250,
            max_delay_ms: 4000,
            backoff: r64(2.0),
        }
    }

    pub fn fixed(max_attempts: usize, delay: Duration) -> Self {
        let delay_ms = delay.as_millis() as u64;
        Self {
            max_attempts: NonZeroUsize::new(max_attempts.max(1)).unwrap(),
            initial_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            backoff: r64(1.0),
        }
    }

    /// The delay to wait after the `failures`-th failure, counted from 1.
    pub fn delay(&self, failures: usize) -> Duration {
        let Self {
            initial_delay_ms,
            max_delay_ms,
            backoff,
            ..
        } = *self;
        let exponent = failures.saturating_sub(1).min(i32::MAX as usize) as i32;
        let delay_ms = (initial_delay_ms as f64 * backoff.raw().powi(exponent))
            .min(max_delay_ms as f64)
            .max(0.0);
        Duration::from_millis(delay_ms as u64)
    }

    /// Runs `f` until it succeeds or the attempts are exhausted.
    ///
    /// The error of the last attempt is returned with a note on the number of
    /// attempts. `what` describes the operation in log messages.
    pub fn run<T, F>(&self, what: impl fmt::Display, mut f: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let max_attempts = self.max_attempts.get();
        let mut attempt = 1;

        loop {
            match f() {
                Ok(output) => return Ok(output),
                Err(err) if attempt < max_attempts => {
                    let delay = self.delay(attempt);
                    warn!(
                        "{} failed (attempt {}/{}), retrying in {:?}: {:#}",
                        what, attempt, max_attempts, delay, err
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => {
                    return Err(err.context(format!(
                        "{} failed after {} attempts",
                        what, max_attempts
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(max_attempts: usize) -> RetryPolicy {
        RetryPolicy {
            max_attempts: NonZeroUsize::new(max_attempts).unwrap(),
            initial_delay_ms: 1,
            max_delay_ms: 4,
            backoff: r64(2.0),
        }
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::write_default();
        assert_eq!(policy.delay(1), Duration::from_millis(250));
        assert_eq!(policy.delay(2), Duration::from_millis(500));
        assert_eq!(policy.delay(3), Duration::from_millis(1000));
        assert_eq!(policy.delay(10), Duration::from_millis(4000));

        let fixed = RetryPolicy::read_default();
        assert_eq!(fixed.delay(1), fixed.delay(3));
    }

    #[test]
    fn transient_failures_are_recovered() {
        let mut calls = 0;
        let output = quick(3)
            .run("flaky operation", || {
                calls += 1;
                ensure!(calls >= 3, "not yet");
                Ok(calls)
            })
            .unwrap();
        assert_eq!(output, 3);
    }

    #[test]
    fn attempts_are_bounded() {
        let mut calls = 0;
        let result: Result<()> = quick(4).run("broken operation", || {
            calls += 1;
            bail!("always failing")
        });
        assert_eq!(calls, 4);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("failed after 4 attempts"));
        assert!(message.contains("always failing"));
    }
}
