pub use accounts::AccountCode;
pub use commands::{
    CreateDocumentCmd, DocumentHeader, DocumentPatch, EntryAction, EntryDiff, EntryInput,
    EntryPatch, SyncAction, SyncChangeRecord, SyncEntryRecord, UpdateDocumentCmd,
};
pub use documents::{Document, DocumentKind};
pub use entries::Entry;
pub use error::LedgerError;
pub use ops::{Engine, EngineBuilder};
pub use schedule::{ScheduleLine, generate_schedule};
pub use schedules::ScheduleEntry;
pub use tally::{TallyCheck, TallyReport, has_cash_leg, has_duplicate_lines, tally};

mod accounts;
mod activity;
mod commands;
mod documents;
mod entries;
mod error;
mod ops;
mod schedule;
mod schedules;
mod tally;

type ResultLedger<T> = Result<T, LedgerError>;
