//! Local model runtime.
//!
//! The GGUF file is loaded by llama.cpp's `llama-server`, launched as a child
//! process on a free loopback port. The child lives exactly as long as the
//! [`LocalRuntime`] handle: dropping the handle kills it.

use std::net::{Ipv4Addr, TcpListener};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

/// How long a model may take to load before we give up.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(180);

const HEALTH_POLL_INTERVAL: Duration = Duration::from_millis(250);
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Name or path of the llama.cpp server binary.
    pub server: String,
    pub model_path: PathBuf,
    pub threads: u32,
    pub context_size: u32,
}

impl RuntimeConfig {
    fn command(&self, port: u16) -> Command {
        let mut c = Command::new(&self.server);
        c.arg("-m")
            .arg(&self.model_path)
            .arg("-c")
            .arg(self.context_size.to_string())
            .arg("-t")
            .arg(self.threads.to_string())
            .arg("--host")
            .arg(Ipv4Addr::LOCALHOST.to_string())
            .arg("--port")
            .arg(port.to_string());
        // Model loading is chatty; keep the user's terminal clean.
        c.stdin(Stdio::null());
        c.stdout(Stdio::null());
        c.stderr(Stdio::null());
        c.kill_on_drop(true);
        c
    }
}

/// A running `llama-server` with the model loaded.
pub struct LocalRuntime {
    child: Child,
    port: u16,
}

impl LocalRuntime {
    /// Spawn the server and wait until it reports healthy.
    pub async fn start(cfg: &RuntimeConfig) -> Result<Self> {
        let port = free_port()?;
        info!(
            server = %cfg.server,
            model = %cfg.model_path.display(),
            port,
            "starting model runtime"
        );

        let mut child = cfg
            .command(port)
            .spawn()
            .with_context(|| format!("Failed to launch model runtime '{}'", cfg.server))?;

        let http = reqwest::Client::new();
        let health_url = format!("http://{}:{}/health", Ipv4Addr::LOCALHOST, port);
        wait_for_health(&http, &health_url, &mut child, STARTUP_TIMEOUT).await?;

        info!(port, "model runtime ready");
        Ok(Self { child, port })
    }

    /// OpenAI-compatible API root served by this runtime.
    pub fn api_base(&self) -> String {
        format!("http://{}:{}/v1", Ipv4Addr::LOCALHOST, self.port)
    }

    /// Stop the server and wait for it to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        self.child
            .kill()
            .await
            .context("Failed to stop model runtime")
    }
}

/// Ask the OS for an unused loopback port.
fn free_port() -> Result<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .context("Failed to reserve a local port for the model runtime")?;
    Ok(listener.local_addr()?.port())
}

/// Poll `url` until it answers 200, the child exits, or `timeout` elapses.
///
/// llama-server answers 503 while the model is still loading.
pub(crate) async fn wait_for_health(
    http: &reqwest::Client,
    url: &str,
    child: &mut Child,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child
            .try_wait()
            .context("Failed to poll model runtime process")?
        {
            bail!("Model runtime exited during startup ({})", status);
        }

        // A probe never outlives the startup deadline.
        let budget = deadline
            .saturating_duration_since(Instant::now())
            .min(HEALTH_PROBE_TIMEOUT);
        match tokio::time::timeout(budget, http.get(url).send()).await {
            Ok(Ok(resp)) if resp.status().is_success() => return Ok(()),
            Ok(Ok(resp)) => debug!(status = %resp.status(), "model runtime not ready"),
            Ok(Err(e)) => debug!(error = %e, "model runtime not reachable yet"),
            Err(_) => debug!("model runtime health probe timed out"),
        }

        if Instant::now() >= deadline {
            bail!(
                "Model runtime did not become ready within {}s",
                timeout.as_secs()
            );
        }
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}
