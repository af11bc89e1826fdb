//! Host GPU capability probe.
//!
//! A layer tagged `nvidia` only applies when the host can actually run
//! accelerated containers, which needs two things at once: the driver CLI
//! (`nvidia-smi`) and an `nvidia` runtime registered with the container
//! engine. The probe is read-only and runs fresh on every resolution pass;
//! results are never cached, so plugging hardware in (or fixing the runtime
//! registration) is picked up by the next invocation.

use crate::command_runner::CommandRunner;

/// Synthetic tag injected into the active set when the probe succeeds.
pub const GPU_TAG: &str = "nvidia";

/// Capability detection seam — the resolver only sees a yes/no answer.
#[allow(async_fn_in_trait)]
pub trait GpuProbe {
    /// True when both the GPU driver and an accelerated container runtime
    /// are present. Never fails; any probe error reads as "not available".
    async fn available(&self) -> bool;
}

/// Production probe backed by subprocess queries.
pub struct HostGpuProbe<'a, R: CommandRunner> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> HostGpuProbe<'a, R> {
    #[must_use]
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> GpuProbe for HostGpuProbe<'_, R> {
    async fn available(&self) -> bool {
        let Ok(driver) = self.runner.run("nvidia-smi", &["--list-gpus"]).await else {
            return false;
        };
        if !driver.status.success() {
            return false;
        }

        let Ok(info) = self
            .runner
            .run("docker", &["info", "--format", "{{json .Runtimes}}"])
            .await
        else {
            return false;
        };
        info.status.success() && String::from_utf8_lossy(&info.stdout).contains("nvidia")
    }
}
