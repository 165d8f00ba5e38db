//! Periodic scheduling control loop.
//!
//! Single-threaded outer loop: fetch the current floor snapshot from the
//! gateway, run one archipelago round against it, persist the resulting
//! dispatch records, sleep until the next tick. Gateway failures and
//! rejected problems skip the round; the loop only stops on the shutdown
//! flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{error, info, warn};

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::ga::Archipelago;
use crate::gateway::{DatastoreGateway, DispatchRecord};
use crate::models::ProblemInput;

/// What one completed round produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub makespan: f64,
    pub mean_flow_time: f64,
    pub elapsed_seconds: f64,
    pub record_count: usize,
}

/// The periodic dispatch scheduler.
pub struct SchedulerService<G> {
    gateway: G,
    config: EngineConfig,
    shutdown: Arc<AtomicBool>,
}

impl<G: DatastoreGateway> SchedulerService<G> {
    /// Creates a service with a fresh shutdown flag. Fails fast on
    /// configuration that violates arithmetic bounds.
    pub fn new(gateway: G, config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_shutdown(gateway, config, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a service sharing an externally owned shutdown flag.
    pub fn with_shutdown(
        gateway: G,
        config: EngineConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            gateway,
            config,
            shutdown,
        })
    }

    /// The flag that stops [`run`](Self::run) after the current round.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Runs rounds until the shutdown flag is raised, sleeping `interval`
    /// between them. Failed rounds are logged and retried next tick.
    pub fn run(&self, interval: Duration) {
        info!(
            interval_seconds = interval.as_secs(),
            "scheduler service started"
        );
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.run_round() {
                Ok(Some(summary)) => {
                    println!(
                        "round complete: makespan={:.3} mean_flow_time={:.3} elapsed_seconds={:.3} records={}",
                        summary.makespan,
                        summary.mean_flow_time,
                        summary.elapsed_seconds,
                        summary.record_count
                    );
                }
                Ok(None) => {}
                Err(err) => error!(%err, "scheduling round failed, retrying next tick"),
            }
            self.sleep_between_rounds(interval);
        }
        info!("scheduler service stopped");
    }

    /// Executes one scheduling round.
    ///
    /// Returns `Ok(None)` when there is nothing to schedule or persist this
    /// tick; errors mean the round was skipped.
    pub fn run_round(&self) -> Result<Option<RoundSummary>, EngineError> {
        let machines = self.gateway.list_machines()?;
        let lots = self.gateway.list_lots()?;
        info!(
            machines = machines.len(),
            lots = lots.len(),
            "floor snapshot fetched"
        );
        if machines.is_empty() || lots.is_empty() {
            info!("no machines or lots, skipping round");
            return Ok(None);
        }

        let times = self.gateway.process_time_matrix(&lots, &machines)?;
        let problem = ProblemInput::new(lots, machines, times)?;
        info!(
            compatible_pairs = problem.compatible_pair_count(),
            "process-time matrix loaded"
        );

        let started = Instant::now();
        let mut archipelago = Archipelago::new(&problem, &self.config)?;
        archipelago.initialize();
        archipelago.evolve(self.config.generation_count);

        let Some((_, schedule)) = archipelago.best_solution() else {
            warn!("no solution produced, skipping persistence");
            return Ok(None);
        };
        if schedule.is_empty() {
            warn!("best schedule is empty, skipping persistence");
            return Ok(None);
        }

        let release_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let records: Vec<DispatchRecord> = schedule
            .assignments
            .iter()
            .filter(|a| a.processing_time > 0.0)
            .map(|a| DispatchRecord {
                machine_id: a.machine_id.clone(),
                lot_id: a.lot_id.clone(),
                release_time,
                start_time: a.start_time,
                end_time: a.end_time,
            })
            .collect();
        self.gateway.save_dispatch_records(&records)?;
        info!(records = records.len(), "dispatch records persisted");

        Ok(Some(RoundSummary {
            makespan: schedule.makespan,
            mean_flow_time: schedule.mean_flow_time,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            record_count: records.len(),
        }))
    }

    /// Sleeps toward the next tick, checking the shutdown flag every second.
    fn sleep_between_rounds(&self, interval: Duration) {
        let deadline = Instant::now() + interval;
        while !self.shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(Duration::from_secs(1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, InMemoryGateway};

    fn config() -> EngineConfig {
        EngineConfig::default()
            .with_population_size(20)
            .with_generation_count(10)
            .with_island_count(2)
            .with_seed(42)
    }

    fn snapshot_gateway() -> InMemoryGateway {
        InMemoryGateway::new(
            vec!["EQP-001".into(), "EQP-002".into()],
            vec!["LOT-A".into(), "LOT-B".into()],
            vec![vec![3.0, 0.0], vec![0.0, 7.0]],
        )
    }

    #[test]
    fn test_round_persists_records() {
        let service = SchedulerService::new(snapshot_gateway(), config()).unwrap();
        let summary = service.run_round().unwrap().unwrap();

        assert_eq!(summary.makespan, 7.0);
        assert_eq!(summary.record_count, 2);
        assert!(summary.elapsed_seconds >= 0.0);

        let batches = service.gateway.saved_batches();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.len(), 2);
        let lot_a = batch.iter().find(|r| r.lot_id == "LOT-A").unwrap();
        assert_eq!(lot_a.machine_id, "EQP-001");
        assert_eq!((lot_a.start_time, lot_a.end_time), (0.0, 3.0));
        assert!(lot_a.release_time > 0.0);
    }

    #[test]
    fn test_empty_floor_skips_round() {
        let gateway = InMemoryGateway::new(vec!["EQP-001".into()], vec![], vec![]);
        let service = SchedulerService::new(gateway, config()).unwrap();

        assert_eq!(service.run_round().unwrap(), None);
        assert!(service.gateway.saved_batches().is_empty());
    }

    #[test]
    fn test_stranded_lot_rejects_round() {
        let gateway = InMemoryGateway::new(
            vec!["EQP-001".into()],
            vec!["LOT-A".into(), "LOT-B".into()],
            vec![vec![3.0], vec![0.0]],
        );
        let service = SchedulerService::new(gateway, config()).unwrap();

        let err = service.run_round().unwrap_err();
        assert!(matches!(err, EngineError::Problem(_)));
        assert!(service.gateway.saved_batches().is_empty());
    }

    #[test]
    fn test_gateway_failure_is_survivable() {
        struct DownGateway;
        impl DatastoreGateway for DownGateway {
            fn list_machines(&self) -> Result<Vec<String>, GatewayError> {
                Err(GatewayError::Unavailable("connection refused".into()))
            }
            fn list_lots(&self) -> Result<Vec<String>, GatewayError> {
                Err(GatewayError::Unavailable("connection refused".into()))
            }
            fn process_time_matrix(
                &self,
                _: &[String],
                _: &[String],
            ) -> Result<Vec<Vec<f64>>, GatewayError> {
                Err(GatewayError::Unavailable("connection refused".into()))
            }
            fn save_dispatch_records(&self, _: &[DispatchRecord]) -> Result<(), GatewayError> {
                Err(GatewayError::Unavailable("connection refused".into()))
            }
        }

        let service = SchedulerService::new(DownGateway, config()).unwrap();
        assert!(matches!(
            service.run_round(),
            Err(EngineError::Gateway(_))
        ));
        // A failed round leaves the service usable for the next tick.
        assert!(matches!(
            service.run_round(),
            Err(EngineError::Gateway(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = EngineConfig::default().with_island_count(0);
        assert!(SchedulerService::new(snapshot_gateway(), config).is_err());
    }

    #[test]
    fn test_run_honours_shutdown_after_current_round() {
        struct OneShotGateway {
            inner: InMemoryGateway,
            shutdown: Arc<AtomicBool>,
        }
        impl DatastoreGateway for OneShotGateway {
            fn list_machines(&self) -> Result<Vec<String>, GatewayError> {
                self.inner.list_machines()
            }
            fn list_lots(&self) -> Result<Vec<String>, GatewayError> {
                self.inner.list_lots()
            }
            fn process_time_matrix(
                &self,
                lots: &[String],
                machines: &[String],
            ) -> Result<Vec<Vec<f64>>, GatewayError> {
                self.inner.process_time_matrix(lots, machines)
            }
            fn save_dispatch_records(&self, records: &[DispatchRecord]) -> Result<(), GatewayError> {
                let result = self.inner.save_dispatch_records(records);
                self.shutdown.store(true, Ordering::Relaxed);
                result
            }
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let gateway = OneShotGateway {
            inner: snapshot_gateway(),
            shutdown: Arc::clone(&shutdown),
        };
        let service =
            SchedulerService::with_shutdown(gateway, config(), shutdown).unwrap();

        service.run(Duration::ZERO);
        assert_eq!(service.gateway.inner.saved_batches().len(), 1);
    }

    #[test]
    fn test_run_exits_immediately_when_already_shut_down() {
        let service = SchedulerService::new(snapshot_gateway(), config()).unwrap();
        service.shutdown_flag().store(true, Ordering::Relaxed);

        service.run(Duration::from_secs(3600));
        assert!(service.gateway.saved_batches().is_empty());
    }
}
