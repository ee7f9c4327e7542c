//! Tally checks over a document's surviving entries.
//!
//! Three independent balance conditions must hold for every committed
//! document state:
//!
//! - debits equal credits over the whole entry set
//! - the net movement (credits minus pass-through deductions) matches on both
//!   sides, isolating the principal from deduction lines
//! - the cash/bank-leg credit sum equals the declared header amount (falling
//!   back to the full credit sum when no cash leg exists)
//!
//! All functions here are pure: no I/O, no clock, deterministic. Amounts are
//! integer minor units compared with exact equality.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Entry;

/// Names the condition a [`crate::LedgerError::TallyMismatch`] failed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TallyCheck {
    DebitCredit,
    NetDebitCredit,
    NetAmount,
    DuplicateLines,
}

impl TallyCheck {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DebitCredit => "debit_credit",
            Self::NetDebitCredit => "net_debit_credit",
            Self::NetAmount => "net_amount",
            Self::DuplicateLines => "duplicate_lines",
        }
    }
}

impl fmt::Display for TallyCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyReport {
    pub debit_credit_balanced: bool,
    pub net_debit_credit_balanced: bool,
    pub net_amount_balanced: bool,
}

impl TallyReport {
    pub fn balanced(&self) -> bool {
        self.debit_credit_balanced && self.net_debit_credit_balanced && self.net_amount_balanced
    }

    pub fn first_failure(&self) -> Option<TallyCheck> {
        if !self.debit_credit_balanced {
            return Some(TallyCheck::DebitCredit);
        }
        if !self.net_debit_credit_balanced {
            return Some(TallyCheck::NetDebitCredit);
        }
        if !self.net_amount_balanced {
            return Some(TallyCheck::NetAmount);
        }
        None
    }
}

/// Runs the three balance conditions over `entries` against the declared
/// header amount. `cash_codes` is the set of account codes flagged as
/// cash/bank legs.
pub fn tally(entries: &[Entry], cash_codes: &HashSet<String>, amount_minor: i64) -> TallyReport {
    let mut total_debit: i64 = 0;
    let mut total_credit: i64 = 0;
    let mut cash_credit: i64 = 0;
    let mut deduction: i64 = 0;
    let mut any_cash_leg = false;

    for entry in entries {
        total_debit += entry.debit_minor;
        total_credit += entry.credit_minor;
        if cash_codes.contains(&entry.account_code) {
            any_cash_leg = true;
            cash_credit += entry.credit_minor;
        } else {
            deduction += entry.credit_minor;
        }
    }

    let net_credit = total_credit - deduction;
    let net_debit = total_debit - deduction;

    TallyReport {
        debit_credit_balanced: total_debit == total_credit,
        net_debit_credit_balanced: net_credit == net_debit,
        net_amount_balanced: if any_cash_leg {
            cash_credit == amount_minor
        } else {
            total_credit == amount_minor
        },
    }
}

/// Whether at least one entry's account code is flagged as a cash/bank leg.
pub fn has_cash_leg(entries: &[Entry], cash_codes: &HashSet<String>) -> bool {
    entries
        .iter()
        .any(|entry| cash_codes.contains(&entry.account_code))
}

/// Whether any two entries share a line number.
pub fn has_duplicate_lines(entries: &[Entry]) -> bool {
    let mut seen = HashSet::with_capacity(entries.len());
    entries.iter().any(|entry| !seen.insert(entry.line_no))
}
