use crate::{
    magicstudio::{CredentialPair, MagicStudioClient},
    models::{GenerationResult, UpstreamOutcome},
};
use std::time::{Duration, Instant};

/// What the state machine does after classifying one attempt.
#[derive(Debug, PartialEq)]
enum Step {
    Done(GenerationResult),
    Retry { pause: Duration },
}

/// Transition table for one attempt.
///
/// Only stale credentials, timeouts and transport blips earn a retry; every
/// other failure is deterministic and re-attempting it just burns latency
/// and upstream goodwill.
fn next_step(
    outcome: UpstreamOutcome,
    attempts_remain: bool,
    key_pause: Duration,
    transient_pause: Duration,
) -> Step {
    match outcome {
        UpstreamOutcome::ImageSuccess {
            bytes,
            content_type,
        } => Step::Done(GenerationResult::Image {
            bytes,
            content_type,
        }),
        // Terminal even with attempts left: a 200 without an image has never
        // been observed to recover on retry.
        UpstreamOutcome::EmptyBody => Step::Done(GenerationResult::failure(
            500,
            "API returned 200 OK but no image",
        )),
        UpstreamOutcome::CredentialsRejected => {
            if attempts_remain {
                Step::Retry { pause: key_pause }
            } else {
                Step::Done(GenerationResult::failure(
                    422,
                    "Keys rejected after multiple attempts",
                ))
            }
        }
        UpstreamOutcome::UpstreamError { status, body } => Step::Done(
            GenerationResult::failure_with_details(status, format!("API Error: {}", status), body),
        ),
        UpstreamOutcome::Timeout => {
            if attempts_remain {
                Step::Retry {
                    pause: transient_pause,
                }
            } else {
                Step::Done(GenerationResult::failure(504, "Request timeout"))
            }
        }
        UpstreamOutcome::NetworkFailure { detail } => {
            if attempts_remain {
                Step::Retry {
                    pause: transient_pause,
                }
            } else {
                Step::Done(GenerationResult::failure_with_details(
                    503,
                    "Network error",
                    detail,
                ))
            }
        }
    }
}

/// Drives up to `max_attempts` upstream calls for one inbound prompt.
///
/// Credentials are request-scoped: a fresh pair is generated for every
/// attempt, so concurrent requests can never observe each other's keys being
/// replaced.
#[derive(Clone)]
pub struct Orchestrator {
    client: MagicStudioClient,
}

impl Orchestrator {
    pub fn new(client: MagicStudioClient) -> Self {
        Self { client }
    }

    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        let config = self.client.config();
        let max_attempts = config.max_attempts.max(1);
        let key_pause = config.key_retry_pause;
        let transient_pause = config.transient_retry_pause;
        let started = Instant::now();

        for attempt in 1..=max_attempts {
            let credentials = CredentialPair::generate();
            let attempt_started = Instant::now();
            let outcome = self.client.attempt(prompt, &credentials).await;

            log::info!(
                "upstream attempt {}/{}: outcome={}, elapsed_ms={}",
                attempt,
                max_attempts,
                outcome.kind(),
                attempt_started.elapsed().as_millis()
            );

            match next_step(outcome, attempt < max_attempts, key_pause, transient_pause) {
                Step::Done(result) => {
                    if let GenerationResult::Failure { status, error, .. } = &result {
                        log::warn!(
                            "generation failed: status={}, error={}, attempts={}, total_ms={}",
                            status,
                            error,
                            attempt,
                            started.elapsed().as_millis()
                        );
                    } else {
                        log::info!(
                            "image generated: attempts={}, total_ms={}",
                            attempt,
                            started.elapsed().as_millis()
                        );
                    }
                    return result;
                }
                Step::Retry { pause } => {
                    log::warn!(
                        "retrying after {}ms: attempt={}/{}",
                        pause.as_millis(),
                        attempt,
                        max_attempts
                    );
                    tokio::time::sleep(pause).await;
                }
            }
        }

        // Unreachable while the table terminates every no-attempts-left
        // branch; kept so a future table edit cannot fall off the loop.
        GenerationResult::failure(500, "Failed after all retries")
    }
}
