//! Shared test helpers for integration tests.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use kudos_boost::{MemoryBoostStore, MultiplierScheme, RecordingEventSink};
use kudos_core::clock::ManualClock;
use kudos_core::error::{BurnError, TransferError};
use kudos_core::traits::{PaymentTransfer, SupplySource, TokenBurner};
use kudos_core::types::{Amount, Asset, Timestamp, Transfer, UserId};
use kudos_engine::{EngineConfig, MemoryLedger, RewardEngine};
use parking_lot::Mutex;

/// Platform account used by [`engine_with_ledger`].
pub const PLATFORM: UserId = UserId([0xee; 32]);

/// Simple user identity from a seed byte.
pub fn user(seed: u8) -> UserId {
    UserId([seed; 32])
}

pub fn tokens(n: u64) -> Amount {
    Amount::from_tokens(n)
}

/// Burner that records every call and optionally fails them all.
#[derive(Default)]
pub struct RecordingBurner {
    calls: Mutex<Vec<(UserId, Amount)>>,
    fail_with: Option<BurnError>,
}

impl RecordingBurner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: BurnError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(err),
        }
    }

    pub fn calls(&self) -> Vec<(UserId, Amount)> {
        self.calls.lock().clone()
    }
}

impl TokenBurner for RecordingBurner {
    fn burn(&self, user: &UserId, amount: Amount) -> Result<(), BurnError> {
        self.calls.lock().push((*user, amount));
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

/// Burner that parks every burn for `gated` until [`release`](Self::release)
/// is called once per parked burn. Burns for other users pass straight through.
pub struct GatedBurner {
    gated: UserId,
    calls: Mutex<Vec<(UserId, Amount)>>,
    entered_tx: Mutex<Sender<()>>,
    entered_rx: Mutex<Receiver<()>>,
    release_tx: Mutex<Sender<()>>,
    release_rx: Mutex<Receiver<()>>,
}

impl GatedBurner {
    pub fn new(gated: UserId) -> Self {
        let (entered_tx, entered_rx) = channel();
        let (release_tx, release_rx) = channel();
        Self {
            gated,
            calls: Mutex::new(Vec::new()),
            entered_tx: Mutex::new(entered_tx),
            entered_rx: Mutex::new(entered_rx),
            release_tx: Mutex::new(release_tx),
            release_rx: Mutex::new(release_rx),
        }
    }

    /// Block until a gated burn has entered the burner.
    pub fn wait_entered(&self, timeout: Duration) -> Result<(), RecvTimeoutError> {
        self.entered_rx.lock().recv_timeout(timeout)
    }

    /// Let one parked burn complete.
    pub fn release(&self) {
        let _ = self.release_tx.lock().send(());
    }

    pub fn calls(&self) -> Vec<(UserId, Amount)> {
        self.calls.lock().clone()
    }
}

impl TokenBurner for GatedBurner {
    fn burn(&self, user: &UserId, amount: Amount) -> Result<(), BurnError> {
        self.calls.lock().push((*user, amount));
        if *user == self.gated {
            let _ = self.entered_tx.lock().send(());
            self.release_rx
                .lock()
                .recv_timeout(Duration::from_secs(10))
                .map_err(|_| BurnError::Ledger("gate never released".into()))?;
        }
        Ok(())
    }
}

/// Payment layer that records transfers and can reject one recipient.
#[derive(Default)]
pub struct RecordingPayments {
    transfers: Mutex<Vec<(Asset, UserId, Amount)>>,
    reject: Option<UserId>,
}

impl RecordingPayments {
    pub fn rejecting(to: UserId) -> Self {
        Self {
            transfers: Mutex::new(Vec::new()),
            reject: Some(to),
        }
    }

    pub fn transfers(&self) -> Vec<(Asset, UserId, Amount)> {
        self.transfers.lock().clone()
    }
}

impl PaymentTransfer for RecordingPayments {
    /// Rejects the whole batch if any leg goes to the rejected account.
    fn transfer_all(&self, legs: &[Transfer]) -> Result<(), TransferError> {
        if let Some(leg) = legs.iter().find(|l| self.reject == Some(l.to)) {
            return Err(TransferError::Ledger(format!("account {} frozen", leg.to.short())));
        }
        self.transfers
            .lock()
            .extend(legs.iter().map(|l| (l.asset, l.to, l.amount)));
        Ok(())
    }
}

pub type LedgerEngine = RewardEngine<MemoryBoostStore, Arc<MemoryLedger>, Arc<RecordingEventSink>>;

/// An engine wired entirely to one [`MemoryLedger`]: supply, burns and
/// payments all go through it.
pub struct LedgerHarness {
    pub engine: LedgerEngine,
    pub ledger: Arc<MemoryLedger>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingEventSink>,
}

pub fn engine_with_ledger(
    balances: &[(UserId, Amount)],
    start: Timestamp,
    scheme: MultiplierScheme,
) -> LedgerHarness {
    let ledger = Arc::new(
        MemoryLedger::from_token_balances(balances.iter().copied())
            .expect("seed balances fit"),
    );
    let clock = Arc::new(ManualClock::new(start));
    let sink = Arc::new(RecordingEventSink::new());
    let config = EngineConfig {
        platform_account: PLATFORM,
        multiplier_scheme: scheme,
        ..EngineConfig::default()
    };
    let supply: Arc<dyn SupplySource> = ledger.clone();
    let engine = RewardEngine::new(
        config,
        MemoryBoostStore::new(),
        ledger.clone(),
        sink.clone(),
        supply,
        clock.clone(),
        ledger.clone(),
    );
    LedgerHarness {
        engine,
        ledger,
        clock,
        sink,
    }
}
