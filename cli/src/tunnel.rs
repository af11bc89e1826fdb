//! Exposure state machine — publish a service behind a public tunnel URL.
//!
//! One exposure attempt walks `Starting -> Polling -> Ready | Failed`:
//! derive the service's internal endpoint from the settings store, spawn a
//! detached `cloudflared` container on the compose network, then poll the
//! container's log tail for the provider-issued URL under a bounded wait.
//! Every failure path of Starting/Polling stops the container before the
//! error surfaces; a `Ready` session deliberately keeps its container
//! running — stopping it would close the tunnel.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use regex::Regex;

use crate::command_runner::CommandRunner;
use crate::error::TunnelError;
use crate::output::OutputContext;
use crate::store::SettingsStore;

/// Name prefix for tunnel containers. `teardown_all` matches on this, so any
/// invocation can stop sessions started by a prior, now-exited one.
pub const SESSION_PREFIX: &str = "quay-tunnel-";

/// Image providing the outbound tunnel.
pub const TUNNEL_IMAGE: &str = "cloudflare/cloudflared:latest";

/// Store key for the compose network the tunnel container attaches to.
pub const NETWORK_KEY: &str = "tunnel.network";

const DEFAULT_NETWORK: &str = "quay";
const URL_PATTERN: &str = r"https://[a-z0-9-]+\.trycloudflare\.com";

/// Exposure lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelState {
    Starting,
    Polling,
    Ready,
    Failed,
}

/// Polling policy. Defaults match the published behaviour (1s interval,
/// 60s bound, 50-line tail); tests shrink them.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Fixed sleep between log reads.
    pub interval: Duration,
    /// Overall bound on the Polling state.
    pub timeout: Duration,
    /// Log tail window per poll — each poll re-reads only this much output.
    pub tail: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
            tail: 50,
        }
    }
}

/// One exposure attempt. Exists for observability in handler output; the
/// process handle is the named container, owned by the engine.
#[derive(Debug, Clone)]
pub struct TunnelSession {
    pub service: String,
    pub internal_url: String,
    pub session: String,
    pub state: TunnelState,
    pub public_url: Option<String>,
}

/// Expose `service` through a background tunnel and return the public URL.
///
/// The spawned container is left running on success. A store that cannot
/// supply the service's port counts as an unavailable endpoint.
///
/// # Errors
///
/// [`TunnelError::EndpointUnavailable`] when no internal endpoint can be
/// derived, [`TunnelError::SpawnFailed`] when the container does not start,
/// [`TunnelError::Unavailable`] when it vanishes mid-poll, and
/// [`TunnelError::Timeout`] when no URL appears within the bound (the
/// container is already stopped by then). None are retried automatically.
pub async fn expose(
    runner: &impl CommandRunner,
    store: &impl SettingsStore,
    ctx: &OutputContext,
    service: &str,
    opts: PollOptions,
) -> Result<TunnelSession, TunnelError> {
    // Starting: derive the internal endpoint and a unique session name.
    let mut session = start_session(store, service)?;

    let network = store
        .get(NETWORK_KEY)
        .ok()
        .flatten()
        .unwrap_or_else(|| DEFAULT_NETWORK.to_string());

    let spawn = runner
        .run(
            "docker",
            &[
                "run",
                "-d",
                "--name",
                &session.session,
                "--network",
                &network,
                TUNNEL_IMAGE,
                "tunnel",
                "--url",
                &session.internal_url,
            ],
        )
        .await
        .map_err(|e| TunnelError::SpawnFailed {
            detail: e.to_string(),
        })?;
    if !spawn.status.success() {
        session.state = TunnelState::Failed;
        return Err(TunnelError::SpawnFailed {
            detail: String::from_utf8_lossy(&spawn.stderr).trim().to_string(),
        });
    }

    // Polling: scan the log tail for the provider URL, bounded in time and
    // in how much output each poll reads.
    session.state = TunnelState::Polling;
    let spinner = ctx
        .show_progress()
        .then(|| crate::output::progress::spinner(&format!("waiting for tunnel to {service}...")));

    let result = poll_for_url(runner, &session.session, opts).await;

    match result {
        PollResult::Ready(url) => {
            if let Some(pb) = spinner {
                crate::output::progress::finish_ok(&pb, &format!("tunnel to {service} is up"));
            }
            session.state = TunnelState::Ready;
            session.public_url = Some(url);
            Ok(session)
        }
        PollResult::Gone => {
            if let Some(pb) = &spinner {
                pb.finish_and_clear();
            }
            session.state = TunnelState::Failed;
            remove_session(runner, ctx, &session.session).await;
            Err(TunnelError::Unavailable {
                service: service.to_string(),
            })
        }
        PollResult::TimedOut => {
            if let Some(pb) = &spinner {
                pb.finish_and_clear();
            }
            // No orphans on the failure path: stop the container first,
            // then report. A cleanup failure is warned about but never
            // masks the timeout itself.
            session.state = TunnelState::Failed;
            remove_session(runner, ctx, &session.session).await;
            Err(TunnelError::Timeout {
                service: service.to_string(),
                elapsed: opts.timeout.as_secs(),
            })
        }
    }
}

/// Stop every tunnel container matching the session naming convention,
/// regardless of which invocation created it. Returns how many were stopped.
///
/// # Errors
///
/// Returns an error if the container engine cannot be queried or the
/// matched containers cannot be removed.
pub async fn teardown_all(runner: &impl CommandRunner) -> Result<usize> {
    let filter = format!("name={SESSION_PREFIX}");
    let listing = runner
        .run("docker", &["ps", "-aq", "--filter", &filter])
        .await
        .context("listing tunnel containers")?;
    if !listing.status.success() {
        anyhow::bail!(
            "listing tunnel containers: {}",
            String::from_utf8_lossy(&listing.stderr).trim()
        );
    }

    let ids: Vec<String> = String::from_utf8_lossy(&listing.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return Ok(0);
    }

    let mut args = vec!["rm", "-f"];
    args.extend(ids.iter().map(String::as_str));
    let removal = runner
        .run("docker", &args)
        .await
        .context("removing tunnel containers")?;
    if !removal.status.success() {
        anyhow::bail!(
            "removing tunnel containers: {}",
            String::from_utf8_lossy(&removal.stderr).trim()
        );
    }
    Ok(ids.len())
}

fn start_session(
    store: &impl SettingsStore,
    service: &str,
) -> Result<TunnelSession, TunnelError> {
    let key = format!("services.{service}.port");
    let port = store
        .get(&key)
        .ok()
        .flatten()
        .ok_or_else(|| TunnelError::EndpointUnavailable {
            service: service.to_string(),
            key: key.clone(),
        })?;

    Ok(TunnelSession {
        service: service.to_string(),
        internal_url: format!("http://{service}:{port}"),
        session: format!("{SESSION_PREFIX}{service}-{}", Utc::now().timestamp()),
        state: TunnelState::Starting,
        public_url: None,
    })
}

enum PollResult {
    Ready(String),
    Gone,
    TimedOut,
}

async fn poll_for_url(
    runner: &impl CommandRunner,
    session: &str,
    opts: PollOptions,
) -> PollResult {
    let tail = opts.tail.to_string();
    let started = tokio::time::Instant::now();

    loop {
        // cloudflared writes the issued URL to stderr; scan both streams.
        match runner
            .run("docker", &["logs", "--tail", &tail, session])
            .await
        {
            Ok(logs) if logs.status.success() => {
                let text = format!(
                    "{}{}",
                    String::from_utf8_lossy(&logs.stdout),
                    String::from_utf8_lossy(&logs.stderr)
                );
                if let Some(url) = extract_url(&text) {
                    return PollResult::Ready(url);
                }
            }
            // Container gone (e.g. a concurrent `tunnel down`) — observe
            // failure rather than hang.
            Ok(_) | Err(_) => return PollResult::Gone,
        }

        if started.elapsed() >= opts.timeout {
            return PollResult::TimedOut;
        }
        tokio::time::sleep(opts.interval).await;
    }
}

/// Extract the first provider-issued public URL from log text.
#[must_use]
#[allow(clippy::expect_used)] // pattern is a compile-time constant
pub fn extract_url(text: &str) -> Option<String> {
    let pattern = Regex::new(URL_PATTERN).expect("valid URL pattern");
    pattern.find(text).map(|m| m.as_str().to_string())
}

/// Best-effort removal of a session container on the failure path.
async fn remove_session(runner: &impl CommandRunner, ctx: &OutputContext, session: &str) {
    match runner.run("docker", &["rm", "-f", session]).await {
        Ok(out) if out.status.success() => {}
        Ok(out) => ctx.warn(&format!(
            "could not remove tunnel container {session}: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )),
        Err(e) => ctx.warn(&format!("could not remove tunnel container {session}: {e}")),
    }
}
