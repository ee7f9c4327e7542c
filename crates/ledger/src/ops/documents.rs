//! Document write operations.
//!
//! Create, update, and soft-delete run each inside one transaction and share
//! the internals in [`common`]: header/entry persistence with affected-count
//! verification, the entry-diff application, the post-mutation tally check,
//! and activity recording.
//!
//! The tally check always runs last, against the full surviving entry set —
//! never against the delta — so a multi-step update may look unbalanced
//! mid-flight while an unbalanced *final* state still aborts the transaction.

mod common;
mod create;
mod delete;
mod get;
mod update;
