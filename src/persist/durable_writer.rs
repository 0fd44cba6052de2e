use std::path::Path;
use std::time::Duration;

use crate::error::{Result, TransformError};

/// How many times a write is attempted and how long to wait between attempts.
///
/// The defaults (3 attempts, 250 ms apart) target short-lived locks such as
/// an antivirus scanner or a thumbnailer holding the file open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy { max_attempts: 3, backoff: Duration::from_millis(250) }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        RetryPolicy { max_attempts: max_attempts.max(1), backoff }
    }
}

/// Runs `op` until it succeeds or `policy.max_attempts` is reached, sleeping
/// `policy.backoff` between attempts. `op` receives the 1-based attempt number.
///
/// On exhaustion returns the last error together with the attempt count.
pub fn retry<T, F>(policy: &RetryPolicy, mut op: F) -> std::result::Result<T, (std::io::Error, u32)>
where
    F: FnMut(u32) -> std::io::Result<T>,
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max => {
                log::warn!("attempt {}/{} failed: {}; retrying in {:?}", attempt, max, e, policy.backoff);
                std::thread::sleep(policy.backoff);
                attempt += 1;
            }
            Err(e) => return Err((e, attempt)),
        }
    }
}

/// Overwrites files in place, absorbing transient write failures.
///
/// Each attempt rewrites the whole buffer, so a failed attempt needs no
/// cleanup. Not atomic across a crash mid-write.
#[derive(Debug, Clone, Default)]
pub struct DurableWriter {
    policy: RetryPolicy,
}

impl DurableWriter {
    pub fn new(policy: RetryPolicy) -> Self {
        DurableWriter { policy }
    }

    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        retry(&self.policy, |_| std::fs::write(path, bytes)).map_err(|(source, attempts)| {
            TransformError::Io { path: path.to_path_buf(), attempts, source }
        })?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    fn instant() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[test]
    fn two_transient_failures_then_success() {
        let mut calls = 0;
        let result = retry(&instant(), |attempt| {
            calls += 1;
            if attempt < 3 {
                Err(Error::new(ErrorKind::PermissionDenied, "locked"))
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn stops_after_third_failure() {
        let mut calls = 0;
        let result: std::result::Result<(), _> = retry(&instant(), |attempt| {
            calls += 1;
            Err(Error::new(ErrorKind::Other, format!("failure {}", attempt)))
        });
        let (err, attempts) = result.unwrap_err();
        assert_eq!(calls, 3);
        assert_eq!(attempts, 3);
        assert_eq!(err.to_string(), "failure 3");
    }

    #[test]
    fn first_success_is_not_retried() {
        let mut calls = 0;
        let result = retry(&instant(), |_| {
            calls += 1;
            Ok::<_, Error>(())
        });
        assert!(result.is_ok());
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy { max_attempts: 0, backoff: Duration::ZERO };
        let mut calls = 0;
        let _ = retry(&policy, |_| {
            calls += 1;
            Err::<(), _>(Error::new(ErrorKind::Other, "nope"))
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Duration::from_millis(250));
    }

    #[test]
    fn writes_whole_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"old contents that are longer").unwrap();
        DurableWriter::new(instant()).write(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn missing_directory_exhausts_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.png");
        let err = DurableWriter::new(instant()).write(&path, b"x").unwrap_err();
        match err {
            TransformError::Io { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected Io, got {:?}", other),
        }
    }
}
