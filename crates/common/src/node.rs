use std::io::{BufRead, BufReader, Read};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};

use crate::logger;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Anvil fork spawned for simulated runs. The child process is killed when
/// the handle drops.
#[derive(Debug)]
pub struct ForkNode {
    child: Child,
    rpc_url: String,
}

impl ForkNode {
    /// Forks the given endpoint with auto-impersonate enabled, so any sender
    /// can submit without holding a key. Returns once the node accepts
    /// requests.
    pub fn start(fork_url: &str) -> anyhow::Result<Self> {
        let port = ephemeral_port()?;
        logger::debug(format!("Forking {fork_url} on port {port}"));

        let mut child = Command::new("anvil")
            .args([
                "--fork-url",
                fork_url,
                "--port",
                &port.to_string(),
                "--auto-impersonate",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn anvil; is foundry installed?")?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture anvil stdout")?;
        let rpc_url = await_ready(stdout, port)?;
        logger::info(format!("Simulation node listening at {rpc_url}"));

        Ok(Self { child, rpc_url })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

impl Drop for ForkNode {
    fn drop(&mut self) {
        if let Err(error) = self.child.kill() {
            logger::warn(format!(
                "Failed to kill anvil (pid {}): {error}",
                self.child.id()
            ));
        }
        // Reap the child so it does not linger as a zombie.
        let _ = self.child.wait();
    }
}

// Anvil prints "Listening on 127.0.0.1:<port>" once its JSON-RPC server is up.
fn await_ready(stdout: impl Read, port: u16) -> anyhow::Result<String> {
    let deadline = Instant::now() + STARTUP_TIMEOUT;
    for line in BufReader::new(stdout).lines() {
        if Instant::now() > deadline {
            bail!("Timed out waiting for anvil to start");
        }
        if line.context("Reading anvil stdout")?.contains("Listening on") {
            return Ok(format!("http://127.0.0.1:{port}"));
        }
    }
    bail!("Anvil exited before becoming ready")
}

fn ephemeral_port() -> anyhow::Result<u16> {
    let listener =
        TcpListener::bind("127.0.0.1:0").context("Failed to reserve a local port")?;
    Ok(listener.local_addr()?.port())
}
