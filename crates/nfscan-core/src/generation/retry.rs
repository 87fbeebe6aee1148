//! Bounded generate-and-validate loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{AttemptFailure, GenerationError};
use crate::invoice::CandidateValidator;
use crate::models::record::ValidatedRecord;

use super::decode::decode_candidate;
use super::CandidateGenerator;

/// Bounds on the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts. Zero is treated as one.
    pub max_attempts: u32,
    /// Deadline for the whole loop, checked before each attempt.
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            timeout: None,
        }
    }
}

/// Cooperative cancellation flag shared between a caller and a running loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A record accepted by the validator and the attempt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub record: ValidatedRecord,
    pub attempts: u32,
}

/// Calls a generator until its output decodes and validates.
///
/// Attempts are independent; only the input text is shared between them.
pub struct RetryingGenerator<G> {
    generator: G,
    validator: CandidateValidator,
    policy: RetryPolicy,
}

impl<G: CandidateGenerator> RetryingGenerator<G> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self {
            generator,
            validator: CandidateValidator::new(),
            policy,
        }
    }

    pub fn with_validator(mut self, validator: CandidateValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Run the loop on `text`, which is both the generator input and the
    /// free text the validator scans for labelled lines.
    pub fn run(&self, text: &str, cancel: &CancelToken) -> Result<GenerationOutcome, GenerationError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let started = Instant::now();
        let mut attempts = 0;

        loop {
            if cancel.is_cancelled() {
                info!("Generation cancelled after {} attempts", attempts);
                return Err(GenerationError::Cancelled { attempts });
            }
            if let Some(timeout) = self.policy.timeout {
                if started.elapsed() >= timeout {
                    info!("Generation timed out after {} attempts", attempts);
                    return Err(GenerationError::TimedOut { attempts });
                }
            }

            attempts += 1;
            match self.attempt(text) {
                Ok(record) => {
                    info!("Valid record produced on attempt {}", attempts);
                    return Ok(GenerationOutcome { record, attempts });
                }
                Err(failure) => {
                    match &failure {
                        AttemptFailure::Generator(e) => {
                            warn!("Attempt {}/{}: generator failed: {}", attempts, max_attempts, e)
                        }
                        other => debug!("Attempt {}/{}: {}", attempts, max_attempts, other),
                    }
                    if attempts >= max_attempts {
                        return Err(GenerationError::Exhausted {
                            attempts,
                            last_failure: failure,
                        });
                    }
                }
            }
        }
    }

    fn attempt(&self, text: &str) -> Result<ValidatedRecord, AttemptFailure> {
        let raw = self.generator.generate(text)?;
        let candidate = decode_candidate(&raw)?;
        debug!("Decoded candidate with {} keys", candidate.len());
        Ok(self.validator.validate(&candidate, text)?)
    }
}
