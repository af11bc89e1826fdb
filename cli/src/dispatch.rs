//! Command dispatch with a single argument-order retry.
//!
//! Handlers report back through the in-process [`Outcome`] enum rather than
//! a magic exit value; process exit codes exist only at this outermost
//! boundary. When the router does not recognise the leading subcommand, the
//! first two positional arguments are swapped and routing runs once more —
//! `quay webui up` becomes `quay up webui`. Exactly one retry, never more.

/// Historical wire value for "unrecognized command", kept for the external
/// contract documentation. The binary itself never exits with it; an
/// unrecognized command after the retry prints usage and exits 2.
pub const UNRECOGNIZED_EXIT: i32 = 42;

/// Tri-state result of one routing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A handler ran and succeeded.
    Handled,
    /// A handler ran and failed with this exit code. Never retried.
    Failed(i32),
    /// No handler matched the leading subcommand.
    Unrecognized,
}

/// Route `args`, retrying once with swapped leading positionals on an
/// unrecognized command, and map the final outcome to a process exit code.
///
/// `usage` is invoked only when both orderings fail to match — the caller
/// supplies top-level help printing so this module stays parser-agnostic.
/// The returned value is the process exit code (the caller feeds it to
/// `ExitCode::from`).
pub async fn dispatch<F, Fut>(router: F, usage: impl FnOnce(), args: Vec<String>) -> u8
where
    F: Fn(Vec<String>) -> Fut,
    Fut: Future<Output = Outcome>,
{
    let mut outcome = router(args.clone()).await;

    if outcome == Outcome::Unrecognized
        && let Some(swapped) = swap_leading_positionals(&args)
    {
        outcome = router(swapped).await;
    }

    match outcome {
        Outcome::Handled => 0,
        Outcome::Failed(code) => {
            if let Some(reason) = describe_exit(code) {
                eprintln!("quay: exit {code}: {reason}");
            }
            narrow_code(code)
        }
        Outcome::Unrecognized => {
            // Both orderings failed to match any known command; the sentinel
            // is suppressed and the user gets the usage summary instead.
            usage();
            2
        }
    }
}

/// Swap the first two positional (non-flag) arguments, leaving everything
/// else untouched. `args[0]` is the program name and never moves. Returns
/// `None` when fewer than two positionals exist — no retry is possible.
#[must_use]
pub fn swap_leading_positionals(args: &[String]) -> Option<Vec<String>> {
    let mut positionals = args
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, arg)| !arg.starts_with('-'))
        .map(|(idx, _)| idx);
    let first = positionals.next()?;
    let second = positionals.next()?;

    let mut swapped = args.to_vec();
    swapped.swap(first, second);
    Some(swapped)
}

/// One-line diagnostics for common process-termination codes.
#[must_use]
pub fn describe_exit(code: i32) -> Option<&'static str> {
    match code {
        0 => Some("success"),
        1 => Some("general error"),
        2 => Some("misuse or invalid arguments"),
        126 => Some("command invoked cannot execute"),
        127 => Some("command not found"),
        128 => Some("invalid argument to exit"),
        129 => Some("terminated by SIGHUP"),
        130 => Some("interrupted by SIGINT"),
        131 => Some("quit by SIGQUIT"),
        137 => Some("killed by SIGKILL (possibly out of memory)"),
        143 => Some("terminated by SIGTERM"),
        _ => None,
    }
}

/// Derive an in-process exit code from a child's `ExitStatus`, folding
/// signal termination into the conventional 128+N codes on unix.
#[must_use]
pub fn status_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

fn narrow_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
