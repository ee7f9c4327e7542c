use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use ledger::{
    CreateDocumentCmd, DocumentHeader, DocumentKind, DocumentPatch, Engine, EntryDiff, EntryInput,
    EntryPatch, LedgerError, TallyCheck, UpdateDocumentCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();

    for (code, name, cash_leg) in [
        ("BANK", "Cash in Bank", true),
        ("CASH", "Cash on Hand", true),
        ("4045", "Loans Receivable", false),
        ("4050", "Service Fee Income", false),
        ("2010", "Members Savings", false),
    ] {
        engine.register_account(code, name, cash_leg).await.unwrap();
    }

    (engine, db)
}

fn doc_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn balanced_voucher(code: &str, amount_minor: i64) -> CreateDocumentCmd {
    CreateDocumentCmd::new(
        DocumentKind::JournalVoucher,
        DocumentHeader::new(code, amount_minor, doc_date(), 3, 2026),
        "alice",
    )
    .entry(EntryInput::new(1, "BANK", 0, amount_minor))
    .entry(EntryInput::new(2, "4045", amount_minor, 0))
}

async fn count_rows(db: &DatabaseConnection, sql: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn create_returns_hydrated_document() {
    let (engine, db) = engine_with_db().await;

    let doc = engine
        .create_document(balanced_voucher("jv#204", 1000))
        .await
        .unwrap();

    assert_eq!(doc.code, "JV#204");
    assert_eq!(doc.amount_minor, 1000);
    assert_eq!(doc.entries.len(), 2);
    assert_eq!(doc.entries[0].line_no, 1);
    assert_eq!(doc.entries[0].credit_minor, 1000);
    assert_eq!(doc.entries[1].debit_minor, 1000);
    assert!(doc.schedule.is_empty());
    assert!(doc.deleted_at.is_none());

    let fetched = engine
        .document(DocumentKind::JournalVoucher, doc.id)
        .await
        .unwrap();
    assert_eq!(fetched.code, "JV#204");
    assert_eq!(fetched.entries.len(), 2);

    // One activity row for the header plus one per entry.
    let activity = count_rows(&db, "SELECT COUNT(*) AS n FROM activity_logs").await;
    assert_eq!(activity, 3);
}

#[tokio::test]
async fn create_rejects_empty_entry_set() {
    let (engine, _db) = engine_with_db().await;

    let cmd = CreateDocumentCmd::new(
        DocumentKind::JournalVoucher,
        DocumentHeader::new("JV#1", 1000, doc_date(), 3, 2026),
        "alice",
    );
    let err = engine.create_document(cmd).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_unbalanced_entries() {
    let (engine, db) = engine_with_db().await;

    let cmd = CreateDocumentCmd::new(
        DocumentKind::JournalVoucher,
        DocumentHeader::new("JV#2", 1000, doc_date(), 3, 2026),
        "alice",
    )
    .entry(EntryInput::new(1, "BANK", 0, 900))
    .entry(EntryInput::new(2, "4045", 1000, 0));

    let err = engine.create_document(cmd).await.unwrap_err();
    assert_eq!(err, LedgerError::TallyMismatch(TallyCheck::DebitCredit));

    // The failed transaction left nothing behind.
    assert_eq!(count_rows(&db, "SELECT COUNT(*) AS n FROM documents").await, 0);
    assert_eq!(count_rows(&db, "SELECT COUNT(*) AS n FROM entries").await, 0);
}

#[tokio::test]
async fn create_rejects_duplicate_line_numbers() {
    let (engine, _db) = engine_with_db().await;

    // Balanced amounts, but both lines carry line number 2.
    let cmd = CreateDocumentCmd::new(
        DocumentKind::JournalVoucher,
        DocumentHeader::new("JV#3", 1000, doc_date(), 3, 2026),
        "alice",
    )
    .entry(EntryInput::new(2, "BANK", 0, 1000))
    .entry(EntryInput::new(2, "4045", 1000, 0));

    let err = engine.create_document(cmd).await.unwrap_err();
    assert_eq!(err, LedgerError::TallyMismatch(TallyCheck::DuplicateLines));
}

#[tokio::test]
async fn loan_release_generates_weekly_schedule() {
    let (engine, _db) = engine_with_db().await;

    // 1000 released with a 50 service-fee deduction: 950 leaves the bank.
    let cmd = CreateDocumentCmd::new(
        DocumentKind::LoanRelease,
        DocumentHeader::new("LR#102", 950, doc_date(), 3, 2026)
            .member_ref("M-0117")
            .no_of_weeks(4),
        "alice",
    )
    .entry(EntryInput::new(1, "4045", 1000, 0).member_ref("M-0117"))
    .entry(EntryInput::new(2, "BANK", 0, 950))
    .entry(EntryInput::new(3, "4050", 0, 50));

    let doc = engine.create_document(cmd).await.unwrap();

    assert_eq!(doc.schedule.len(), 4);
    for (i, row) in doc.schedule.iter().enumerate() {
        let week = i as i32 + 1;
        assert_eq!(row.week_no, week);
        assert_eq!(
            row.due_date,
            doc_date() + chrono::Duration::days(7 * i64::from(week))
        );
        assert!(!row.paid);
    }
}

#[tokio::test]
async fn loan_release_requires_a_term() {
    let (engine, _db) = engine_with_db().await;

    let cmd = CreateDocumentCmd::new(
        DocumentKind::LoanRelease,
        DocumentHeader::new("LR#103", 1000, doc_date(), 3, 2026),
        "alice",
    )
    .entry(EntryInput::new(1, "4045", 1000, 0))
    .entry(EntryInput::new(2, "BANK", 0, 1000));

    let err = engine.create_document(cmd).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn code_uniqueness_spans_document_kinds() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_document(balanced_voucher("X#1", 1000))
        .await
        .unwrap();

    let cmd = CreateDocumentCmd::new(
        DocumentKind::OfficialReceipt,
        DocumentHeader::new("x#1", 500, doc_date(), 3, 2026),
        "alice",
    )
    .entry(EntryInput::new(1, "BANK", 0, 500))
    .entry(EntryInput::new(2, "2010", 500, 0));

    let err = engine.create_document(cmd).await.unwrap_err();
    assert_eq!(err, LedgerError::CodeTaken("X#1".to_string()));

    assert!(!engine.is_code_unique("x#1").await.unwrap());
    assert!(engine.is_code_unique("X#2").await.unwrap());
}

#[tokio::test]
async fn update_rejects_tally_mismatch_and_keeps_state() {
    let (engine, _db) = engine_with_db().await;

    let doc = engine
        .create_document(balanced_voucher("JV#10", 1000))
        .await
        .unwrap();
    let bank_entry = doc.entries[0].id;
    let loan_entry = doc.entries[1].id;

    // Credit side drops to 900: debits no longer equal credits.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc.id, "alice").diff(
        EntryDiff {
            to_update: vec![EntryPatch::new(bank_entry).credit_minor(900)],
            ..Default::default()
        },
    );
    let err = engine.update_document(cmd).await.unwrap_err();
    assert_eq!(err, LedgerError::TallyMismatch(TallyCheck::DebitCredit));

    // Both legs at 900 balance each other but no longer match the declared
    // amount of 1000.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc.id, "alice").diff(
        EntryDiff {
            to_update: vec![
                EntryPatch::new(bank_entry).credit_minor(900),
                EntryPatch::new(loan_entry).debit_minor(900),
            ],
            ..Default::default()
        },
    );
    let err = engine.update_document(cmd).await.unwrap_err();
    assert_eq!(err, LedgerError::TallyMismatch(TallyCheck::NetAmount));

    // Neither failed update left a trace.
    let fetched = engine
        .document(DocumentKind::JournalVoucher, doc.id)
        .await
        .unwrap();
    assert_eq!(fetched.amount_minor, 1000);
    assert_eq!(fetched.entries[0].credit_minor, 1000);
    assert_eq!(fetched.entries[1].debit_minor, 1000);
}

#[tokio::test]
async fn update_applies_header_patch_and_entry_diff() {
    let (engine, _db) = engine_with_db().await;

    let doc = engine
        .create_document(balanced_voucher("JV#11", 1000))
        .await
        .unwrap();
    let bank_entry = doc.entries[0].id;

    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc.id, "alice")
        .patch(DocumentPatch::default().amount_minor(1200))
        .diff(EntryDiff {
            to_create: vec![EntryInput::new(3, "4050", 200, 0)],
            to_update: vec![EntryPatch::new(bank_entry).credit_minor(1200)],
            to_delete_ids: vec![],
        });
    let updated = engine.update_document(cmd).await.unwrap();

    assert_eq!(updated.amount_minor, 1200);
    assert_eq!(updated.entries.len(), 3);
    assert_eq!(updated.entries[0].credit_minor, 1200);
    assert_eq!(updated.entries[2].account_code, "4050");
}

#[tokio::test]
async fn failed_update_persists_none_of_its_mutations() {
    let (engine, db) = engine_with_db().await;

    let cmd = CreateDocumentCmd::new(
        DocumentKind::JournalVoucher,
        DocumentHeader::new("JV#12", 1000, doc_date(), 3, 2026),
        "alice",
    )
    .entry(EntryInput::new(1, "BANK", 0, 1000))
    .entry(EntryInput::new(2, "4045", 800, 0))
    .entry(EntryInput::new(3, "4050", 200, 0));
    let doc = engine.create_document(cmd).await.unwrap();

    // Three creates, one update, one delete — and a final state that cannot
    // tally. None of the six mutations may survive.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc.id, "alice")
        .patch(DocumentPatch::default().amount_minor(999))
        .diff(EntryDiff {
            to_create: vec![
                EntryInput::new(4, "4050", 70, 0),
                EntryInput::new(5, "2010", 50, 0),
                EntryInput::new(6, "2010", 30, 0),
            ],
            to_update: vec![EntryPatch::new(doc.entries[1].id).debit_minor(900)],
            to_delete_ids: vec![doc.entries[2].id],
        });
    let err = engine.update_document(cmd).await.unwrap_err();
    assert!(matches!(err, LedgerError::TallyMismatch(_)));

    let fetched = engine
        .document(DocumentKind::JournalVoucher, doc.id)
        .await
        .unwrap();
    assert_eq!(fetched.amount_minor, 1000);
    assert_eq!(fetched.entries.len(), 3);
    assert_eq!(fetched.entries[1].debit_minor, 800);
    assert!(fetched.entries[2].deleted_at.is_none());

    // Row count includes soft-deleted entries; the three inserts rolled back.
    assert_eq!(count_rows(&db, "SELECT COUNT(*) AS n FROM entries").await, 3);
}

#[tokio::test]
async fn soft_delete_cascades_and_second_delete_fails() {
    let (engine, db) = engine_with_db().await;

    let cmd = CreateDocumentCmd::new(
        DocumentKind::LoanRelease,
        DocumentHeader::new("LR#104", 950, doc_date(), 3, 2026).no_of_weeks(3),
        "alice",
    )
    .entry(EntryInput::new(1, "4045", 1000, 0))
    .entry(EntryInput::new(2, "BANK", 0, 950))
    .entry(EntryInput::new(3, "4050", 0, 50));
    let doc = engine.create_document(cmd).await.unwrap();

    let deleted_id = engine
        .soft_delete_document(DocumentKind::LoanRelease, doc.id, "alice")
        .await
        .unwrap();
    assert_eq!(deleted_id, doc.id);

    let err = engine
        .document(DocumentKind::LoanRelease, doc.id)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::KeyNotFound("document not exists".to_string()));

    // The cascade reached every owned row.
    let live_entries = count_rows(
        &db,
        "SELECT COUNT(*) AS n FROM entries WHERE deleted_at IS NULL",
    )
    .await;
    assert_eq!(live_entries, 0);
    let live_schedule = count_rows(
        &db,
        "SELECT COUNT(*) AS n FROM payment_schedules WHERE deleted_at IS NULL",
    )
    .await;
    assert_eq!(live_schedule, 0);

    // Second delete: no surviving header, no partial cascade.
    let err = engine
        .soft_delete_document(DocumentKind::LoanRelease, doc.id, "alice")
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::KeyNotFound("document not exists".to_string()));
}

#[tokio::test]
async fn soft_deleted_document_releases_its_code() {
    let (engine, _db) = engine_with_db().await;

    let doc = engine
        .create_document(balanced_voucher("JV#9", 1000))
        .await
        .unwrap();
    assert!(!engine.is_code_unique("JV#9").await.unwrap());

    engine
        .soft_delete_document(DocumentKind::JournalVoucher, doc.id, "alice")
        .await
        .unwrap();
    assert!(engine.is_code_unique("JV#9").await.unwrap());

    engine
        .create_document(balanced_voucher("JV#9", 700))
        .await
        .unwrap();
}

#[tokio::test]
async fn deleting_an_already_deleted_entry_fails_the_update() {
    let (engine, _db) = engine_with_db().await;

    let cmd = CreateDocumentCmd::new(
        DocumentKind::JournalVoucher,
        DocumentHeader::new("JV#13", 800, doc_date(), 3, 2026),
        "alice",
    )
    .entry(EntryInput::new(1, "BANK", 0, 800))
    .entry(EntryInput::new(2, "4045", 1000, 0))
    .entry(EntryInput::new(3, "4050", 0, 200));
    let doc = engine.create_document(cmd).await.unwrap();
    let fee_entry = doc.entries[2].id;
    let loan_entry = doc.entries[1].id;

    // First update removes the fee line and rebalances.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc.id, "alice").diff(
        EntryDiff {
            to_update: vec![EntryPatch::new(loan_entry).debit_minor(800)],
            to_delete_ids: vec![fee_entry],
            ..Default::default()
        },
    );
    engine.update_document(cmd).await.unwrap();

    // Deleting the same line again matches zero rows.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc.id, "alice").diff(
        EntryDiff {
            to_delete_ids: vec![fee_entry],
            ..Default::default()
        },
    );
    let err = engine.update_document(cmd).await.unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
}

#[tokio::test]
async fn update_checks_code_uniqueness_only_on_change() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_document(balanced_voucher("JV#1", 1000))
        .await
        .unwrap();
    let doc_b = engine
        .create_document(balanced_voucher("JV#2", 500))
        .await
        .unwrap();

    // Renaming onto a held code fails.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc_b.id, "alice")
        .patch(DocumentPatch::default().code("JV#1"));
    let err = engine.update_document(cmd).await.unwrap_err();
    assert_eq!(err, LedgerError::CodeTaken("JV#1".to_string()));

    // Re-submitting the current code (any casing) is not a rename.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc_b.id, "alice")
        .patch(DocumentPatch::default().code("jv#2"));
    engine.update_document(cmd).await.unwrap();

    // A genuinely new code goes through and releases the old one.
    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, doc_b.id, "alice")
        .patch(DocumentPatch::default().code("JV#3"));
    let updated = engine.update_document(cmd).await.unwrap();
    assert_eq!(updated.code, "JV#3");
    assert!(engine.is_code_unique("JV#2").await.unwrap());
}

#[tokio::test]
async fn operations_on_missing_documents_fail_not_found() {
    let (engine, _db) = engine_with_db().await;
    let ghost = Uuid::new_v4();

    let err = engine
        .document(DocumentKind::JournalVoucher, ghost)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::KeyNotFound("document not exists".to_string()));

    let cmd = UpdateDocumentCmd::new(DocumentKind::JournalVoucher, ghost, "alice");
    let err = engine.update_document(cmd).await.unwrap_err();
    assert_eq!(err, LedgerError::KeyNotFound("document not exists".to_string()));

    let err = engine
        .soft_delete_document(DocumentKind::JournalVoucher, ghost, "alice")
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::KeyNotFound("document not exists".to_string()));
}

#[tokio::test]
async fn document_kind_scopes_lookups() {
    let (engine, _db) = engine_with_db().await;

    let doc = engine
        .create_document(balanced_voucher("JV#20", 1000))
        .await
        .unwrap();

    // The same id under a different kind is not found.
    let err = engine
        .document(DocumentKind::ExpenseVoucher, doc.id)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::KeyNotFound("document not exists".to_string()));
}
