//! # Transfer Journal
//!
//! Compensating-action log for multi-account operations. A transfer is two
//! single-account writes; the journal records where between them an
//! operation died. An entry stuck in `DebitApplied` is money that left one
//! account and never arrived at the other; `unreconciled()` surfaces
//! exactly those for reconciliation.

use std::fmt;

/// What kind of value a journaled operation moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegKind {
    /// Monetary balance.
    Balance,
    /// Reputation points.
    Points,
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegKind::Balance => f.write_str("balance"),
            LegKind::Points => f.write_str("points"),
        }
    }
}

/// Progress of one journaled two-leg operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Entry recorded; debit not yet applied.
    Started,
    /// Debit applied; credit outstanding. Terminal only on failure.
    DebitApplied,
    /// Both legs applied.
    Reconciled,
    /// Aborted before any mutation.
    Aborted,
}

/// One journaled two-leg operation.
#[derive(Debug, Clone)]
pub struct TransferEntry {
    /// Journal-local sequence number.
    pub seq: u64,
    /// Account debited.
    pub debit_account: String,
    /// Account (or cause) credited.
    pub credit_account: String,
    /// Amount moved.
    pub amount: f64,
    /// What is moved.
    pub kind: LegKind,
    /// Current progress.
    pub state: TransferState,
}

/// In-process compensating-action log.
///
/// Process-local working state: it tracks operations this process started,
/// so an operator can detect a second leg that never landed. It is not a
/// shared ledger of record.
#[derive(Debug, Default)]
pub struct TransferJournal {
    next_seq: u64,
    entries: Vec<TransferEntry>,
}

impl TransferJournal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a two-leg operation. Returns its sequence number.
    pub fn begin(
        &mut self,
        debit_account: impl Into<String>,
        credit_account: impl Into<String>,
        amount: f64,
        kind: LegKind,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(TransferEntry {
            seq,
            debit_account: debit_account.into(),
            credit_account: credit_account.into(),
            amount,
            kind,
            state: TransferState::Started,
        });
        seq
    }

    /// Mark the debit leg applied.
    pub fn mark_debited(&mut self, seq: u64) {
        self.set_state(seq, TransferState::DebitApplied);
    }

    /// Mark both legs applied.
    pub fn mark_reconciled(&mut self, seq: u64) {
        self.set_state(seq, TransferState::Reconciled);
    }

    /// Mark the operation aborted before any mutation.
    pub fn mark_aborted(&mut self, seq: u64) {
        self.set_state(seq, TransferState::Aborted);
    }

    /// Entries whose debit landed but whose credit did not.
    #[must_use]
    pub fn unreconciled(&self) -> Vec<TransferEntry> {
        self.entries
            .iter()
            .filter(|e| e.state == TransferState::DebitApplied)
            .cloned()
            .collect()
    }

    /// All entries, in begin order.
    #[must_use]
    pub fn entries(&self) -> &[TransferEntry] {
        &self.entries
    }

    fn set_state(&mut self, seq: u64, state: TransferState) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.seq == seq) {
            entry.state = state;
        }
    }
}
