use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{debug, info, warn};

use super::fetch::{DataSource, fetch_text};
use super::model::{Entity, LedgerDataset, YearTotals};
use super::parse::{parse_entities, parse_totals};

#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub entities: DataSource,
    pub totals: DataSource,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub entities: Result<Vec<Entity>>,
    pub totals: Result<Vec<YearTotals>>,
}

impl LoadOutcome {
    pub fn into_dataset(self) -> Option<LedgerDataset> {
        match (self.entities, self.totals) {
            (Ok(entities), Ok(totals)) => {
                info!(
                    entities = entities.len(),
                    years = totals.len(),
                    "ledger dataset loaded"
                );
                Some(LedgerDataset { entities, totals })
            }
            (entities, totals) => {
                if let Err(error) = &entities {
                    warn!("entity list unavailable, using placeholder: {error:#}");
                }
                if let Err(error) = &totals {
                    warn!("yearly totals unavailable, using placeholder: {error:#}");
                }
                None
            }
        }
    }
}

pub fn load_ledger(request: &LoadRequest, cancelled: &AtomicBool) -> Option<LoadOutcome> {
    if cancelled.load(Ordering::Acquire) {
        return None;
    }
    let entities = fetch_text(&request.entities, request.timeout)
        .and_then(|raw| parse_entities(&raw));

    if cancelled.load(Ordering::Acquire) {
        return None;
    }
    let totals =
        fetch_text(&request.totals, request.timeout).and_then(|raw| parse_totals(&raw));

    Some(LoadOutcome { entities, totals })
}

pub struct LoadHandle {
    rx: Receiver<LoadOutcome>,
    cancelled: Arc<AtomicBool>,
}

impl LoadHandle {
    pub fn spawn(request: LoadRequest) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker_cancelled = Arc::clone(&cancelled);

        thread::spawn(move || {
            let Some(outcome) = load_ledger(&request, &worker_cancelled) else {
                debug!("ledger load cancelled before completion");
                return;
            };
            if worker_cancelled.load(Ordering::Acquire) {
                debug!("ledger load finished after its view went away");
                return;
            }
            let _ = tx.send(outcome);
        });

        Self { rx, cancelled }
    }

    pub fn poll(&self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadOutcome {
                entities: Err(anyhow!("background load worker disconnected")),
                totals: Err(anyhow!("background load worker disconnected")),
            }),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
