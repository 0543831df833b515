//! The traffic driver: one self-rearming call loop per caller instance.

use std::sync::Arc;

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::catalogue::WeightedCatalogue;
use crate::config::CallerConfig;
use crate::error::TendrilError;
use crate::protocol::{McpRequest, RequestIdSource};
use crate::schedule::{next_delay, seasonal_multiplier};
use crate::transport::{DirectTransport, McpTransport, StreamingTransport};

/// Control messages accepted by a running caller.
enum Control {
    UpdateConfig(CallerConfig),
    Stop,
}

/// Synthetic traffic driver.
///
/// Owns the request-id counter, the RNG, and both transports. Exactly one
/// timer is pending at a time; the next delay is computed fresh from
/// wall-clock state after each call settles, never from a fixed period.
pub struct Caller {
    config: CallerConfig,
    catalogue: WeightedCatalogue,
    direct: Arc<dyn McpTransport>,
    streaming: Arc<dyn McpTransport>,
    ids: RequestIdSource,
    rng: StdRng,
}

impl Caller {
    /// Build a caller with real HTTP transports from the config.
    pub fn new(config: CallerConfig) -> Self {
        let client = reqwest::Client::new();
        let direct = DirectTransport::new(client.clone(), config.server_url.clone());
        let streaming =
            StreamingTransport::new(client, config.sse_url.clone(), direct.clone());
        Self::with_transports(
            config,
            WeightedCatalogue::default_catalogue(),
            Arc::new(direct),
            Arc::new(streaming),
        )
    }

    /// Build a caller over explicit transports.
    pub fn with_transports(
        config: CallerConfig,
        catalogue: WeightedCatalogue,
        direct: Arc<dyn McpTransport>,
        streaming: Arc<dyn McpTransport>,
    ) -> Self {
        Self {
            config,
            catalogue,
            direct,
            streaming,
            ids: RequestIdSource::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the RNG with a seeded one for reproducible schedules.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Validate connectivity, fire one call immediately, then enter the
    /// self-rearming loop. Returns a handle for reconfiguration and stop.
    pub async fn start(mut self) -> Result<CallerHandle, TendrilError> {
        self.config.validate()?;
        self.handshake().await?;
        tracing::info!(
            server = %self.config.server_url,
            stream = %self.config.sse_url,
            targets = self.catalogue.len(),
            "connected; starting call loop"
        );

        self.execute_one_call().await;

        let (control, inbox) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run_loop(inbox));
        Ok(CallerHandle { control, task })
    }

    /// One `initialize` round trip over the direct transport. Any failure
    /// here is fatal; per-call errors later never are.
    async fn handshake(&self) -> Result<(), TendrilError> {
        let request = McpRequest::initialize(self.ids.next_id());
        let response = self
            .direct
            .send(&request)
            .await
            .map_err(|e| TendrilError::Connectivity(e.to_string()))?;
        if let Some(error) = response.error {
            return Err(TendrilError::Connectivity(format!(
                "initialize failed: {}",
                error.message
            )));
        }
        Ok(())
    }

    async fn run_loop(mut self, mut inbox: mpsc::UnboundedReceiver<Control>) {
        loop {
            let now = Local::now();
            let delay = next_delay(&self.config, &now, &mut self.rng);
            tracing::info!(
                delay_ms = delay.as_millis() as u64,
                seasonal = seasonal_multiplier(&now),
                "next call scheduled"
            );

            let sleep = tokio::time::sleep(delay);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    _ = &mut sleep => break,
                    message = inbox.recv() => match message {
                        Some(Control::UpdateConfig(new_config)) => {
                            if let Err(error) = new_config.validate() {
                                tracing::warn!(%error, "ignoring invalid configuration update");
                                continue;
                            }
                            let interval_changed =
                                new_config.base_interval != self.config.base_interval;
                            self.config = new_config;
                            if interval_changed {
                                let now = Local::now();
                                let delay = next_delay(&self.config, &now, &mut self.rng);
                                tracing::info!(
                                    delay_ms = delay.as_millis() as u64,
                                    "base interval changed; rescheduling pending call"
                                );
                                sleep.as_mut().reset(Instant::now() + delay);
                            }
                        }
                        Some(Control::Stop) | None => {
                            tracing::info!("caller stopped");
                            return;
                        }
                    }
                }
            }

            self.execute_one_call().await;
        }
    }

    /// Pick a target, pick a transport, fire one call, log the outcome.
    ///
    /// The target draw and the transport draw are independent. Failures are
    /// swallowed so the loop always reaches the next scheduling cycle.
    async fn execute_one_call(&mut self) {
        let target = self.catalogue.pick(&mut self.rng).clone();
        let use_stream = self
            .rng
            .gen_bool(f64::from(self.config.sse_percent) / 100.0);

        let id = self.ids.next_id();
        let request = McpRequest::new(id, target.kind.method(), target.params());
        let transport_name = if use_stream { "sse" } else { "http" };
        tracing::info!(
            kind = %target.kind,
            name = %target.name,
            id,
            transport = transport_name,
            "dispatching call"
        );

        let transport = if use_stream {
            &self.streaming
        } else {
            &self.direct
        };
        let outcome = transport.send(&request).await.and_then(|response| {
            match response.error {
                Some(error) => Err(TendrilError::Protocol {
                    code: error.code,
                    message: error.message,
                }),
                None => Ok(response),
            }
        });

        match outcome {
            Ok(_) => tracing::info!(id, "call succeeded"),
            Err(error) => tracing::warn!(id, %error, "call failed"),
        }
    }
}

/// Handle to a running caller loop.
///
/// Dropping the handle stops the loop at its next scheduling point, same as
/// an explicit [`CallerHandle::stop`].
pub struct CallerHandle {
    control: mpsc::UnboundedSender<Control>,
    task: JoinHandle<()>,
}

impl CallerHandle {
    /// Replace the runtime configuration.
    ///
    /// Applied at the next scheduling point; if the base interval changed
    /// while a timer is pending, the pending delay is recomputed and
    /// re-armed immediately.
    pub fn update_config(&self, config: CallerConfig) {
        let _ = self.control.send(Control::UpdateConfig(config));
    }

    /// Cancel the pending timer and end the loop. Idempotent. A call
    /// already in flight is not aborted; its own timeout bounds it.
    pub fn stop(&self) {
        let _ = self.control.send(Control::Stop);
    }

    /// Wait for the loop task to finish.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}
