use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cashflow_core::{CashflowError, FlowKind, Session};
use rusqlite::Connection;

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be available")
            .as_nanos();
        let filename = format!("{}_{}_{}.cashflow", prefix, std::process::id(), nanos);
        let path = std::env::temp_dir().join(filename);
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[test]
fn test_save_open_round_trip() {
    let temp = TempFile::new("cashflow_round_trip");
    let mut session = Session::new_database().expect("new database should succeed");
    session.add_period("Jan").unwrap();
    session.add_period("Feb").unwrap();
    assert!(session.status().modified);

    session.save_as(&temp.path).expect("save_as should succeed");
    let status = session.status();
    assert!(!status.modified);
    assert_eq!(status.current_file.as_deref(), Some(temp.path.as_path()));

    let reopened = Session::open(&temp.path).expect("open should succeed");
    assert_eq!(reopened.contents().unwrap(), session.contents().unwrap());
    assert_eq!(reopened.flows(), session.flows());
    assert_eq!(reopened.status().log_count, 2);
    assert!(!reopened.status().modified);
}

#[test]
fn test_history_survives_reopen() {
    let temp = TempFile::new("cashflow_history");
    let mut session = Session::new_database().unwrap();
    let jan = session.add_period("Jan").unwrap().row_id.unwrap();
    session.rename_period(&jan, "January").unwrap();
    session.save_as(&temp.path).unwrap();
    drop(session);

    let mut reopened = Session::open(&temp.path).unwrap();
    reopened.undo().expect("undo after reopen should succeed");
    assert_eq!(reopened.period(&jan).unwrap().name, "Jan");
    assert!(reopened.status().modified);
}

#[test]
fn test_saved_cursor_is_restored() {
    let temp = TempFile::new("cashflow_cursor");
    let mut session = Session::new_database().unwrap();
    session.add_period("Jan").unwrap();
    session.add_period("Feb").unwrap();
    session.add_period("Mar").unwrap();
    session.undo().unwrap();
    session.save_as(&temp.path).unwrap();

    let mut reopened = Session::open(&temp.path).unwrap();
    let status = reopened.status();
    assert_eq!(status.log_count, 3);
    assert_eq!(status.log_index, 2);
    assert_eq!(reopened.periods().unwrap().len(), 2);

    reopened.redo().expect("the undone edit can still be redone");
    assert_eq!(reopened.periods().unwrap().len(), 3);
}

#[test]
fn test_file_without_cursor_opens_at_end_of_log() {
    let temp = TempFile::new("cashflow_no_cursor");
    let mut session = Session::new_database().unwrap();
    session.add_period("Jan").unwrap();
    session.save_as(&temp.path).unwrap();

    let conn = Connection::open(&temp.path).unwrap();
    conn.execute("DELETE FROM meta WHERE key = 'log_cursor'", [])
        .unwrap();
    drop(conn);

    let reopened = Session::open(&temp.path).unwrap();
    assert!(reopened.status().at_end);
    assert_eq!(reopened.status().log_index, 1);
}

/// Rewrite every key of a saved budget the way some other writers store
/// them: wrapped in braces.
fn brace_ids(path: &std::path::Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = OFF;
        UPDATE flow SET id = '{' || id || '}';
        UPDATE category SET id = '{' || id || '}', flowId = '{' || flowId || '}';
        UPDATE item SET id = '{' || id || '}', categoryId = '{' || categoryId || '}';
        UPDATE period SET id = '{' || id || '}';
        UPDATE register
           SET id = '{' || id || '}', periodId = '{' || periodId || '}',
               itemId = '{' || itemId || '}';
        INSERT INTO period (id, name)
            VALUES ('{6f1c2a9e-4b7d-4e38-9a51-0c2d3e4f5a6b}', 'Jan');
        "#,
    )
    .unwrap();
}

#[test]
fn test_braced_ids_are_edited_and_undone_in_place() {
    let temp = TempFile::new("cashflow_braced");
    let mut session = Session::new_database().unwrap();
    session.save_as(&temp.path).unwrap();
    drop(session);
    brace_ids(&temp.path);

    let mut session = Session::open(&temp.path).expect("braced file should open");
    assert!(session.flows().in_flow.as_str().starts_with('{'));
    let before = session.contents().unwrap();

    let jan = session.periods().unwrap().remove(0).period_id;
    assert_eq!(jan.as_str(), "{6f1c2a9e-4b7d-4e38-9a51-0c2d3e4f5a6b}");
    assert_eq!(jan.bare(), "6f1c2a9e-4b7d-4e38-9a51-0c2d3e4f5a6b");

    session.rename_period(&jan, "January").unwrap();
    assert_eq!(session.period(&jan).unwrap().name, "January");
    let pets = session
        .add_category("Pets", FlowKind::Out)
        .unwrap()
        .row_id
        .unwrap();
    assert_eq!(session.category(&pets).unwrap().flow_id, session.flows().out_flow);
    let gift = session
        .item_map(Some(FlowKind::In))
        .unwrap()
        .into_iter()
        .find(|row| row.item_name == "Birthday Gift")
        .unwrap()
        .item_id;
    session.register_item(&jan, &gift, 25.0, 0.0, "").unwrap();

    session.undo().unwrap();
    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.contents().unwrap(), before);
    assert_eq!(session.period(&jan).unwrap().name, "Jan");

    session.redo().unwrap();
    session.save().unwrap();
    let reopened = Session::open(&temp.path).unwrap();
    assert_eq!(reopened.period(&jan).unwrap().name, "January");
}

#[test]
fn test_backup_keeps_current_file_and_modified_flag() {
    let main = TempFile::new("cashflow_main");
    let backup = TempFile::new("cashflow_backup");
    let mut session = Session::new_database().unwrap();
    session.save_as(&main.path).unwrap();
    session.add_period("Jan").unwrap();

    session.backup_as(&backup.path).expect("backup should succeed");
    let status = session.status();
    assert_eq!(status.current_file.as_deref(), Some(main.path.as_path()));
    assert!(status.modified);

    let copy = Session::open(&backup.path).unwrap();
    assert_eq!(copy.periods().unwrap().len(), 1);
    let original = Session::open(&main.path).unwrap();
    assert!(original.periods().unwrap().is_empty());
}

#[test]
fn test_save_writes_to_current_file() {
    let temp = TempFile::new("cashflow_save");
    let mut session = Session::new_database().unwrap();
    session.save_as(&temp.path).unwrap();
    session.add_period("Jan").unwrap();
    session.save().expect("save should succeed");

    let reopened = Session::open(&temp.path).unwrap();
    assert_eq!(reopened.periods().unwrap().len(), 1);
}

#[test]
fn test_open_requires_both_flows() {
    let temp = TempFile::new("cashflow_missing_flow");
    let mut session = Session::new_database().unwrap();
    session.save_as(&temp.path).unwrap();

    let conn = Connection::open(&temp.path).unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF; DELETE FROM flow WHERE name = 'In';")
        .unwrap();
    drop(conn);

    match Session::open(&temp.path) {
        Err(CashflowError::MissingFlow(name)) => assert_eq!(name, "In"),
        Err(other) => panic!("expected MissingFlow, got {:?}", other),
        Ok(_) => panic!("expected MissingFlow, got a session"),
    }
}

#[test]
fn test_failed_load_keeps_current_session() {
    let missing = TempFile::new("cashflow_missing");
    let mut session = Session::new_database().unwrap();
    session.add_period("Jan").unwrap();

    let result = session.load(&missing.path);
    assert!(matches!(result, Err(CashflowError::FileIo(_))));
    assert_eq!(session.periods().unwrap().len(), 1);
    assert_eq!(session.status().log_count, 1);
}

#[test]
fn test_open_rejects_non_database_files() {
    let temp = TempFile::new("cashflow_garbage");
    fs::write(&temp.path, b"this is not a budget, just some text that is long enough")
        .unwrap();

    assert!(matches!(
        Session::open(&temp.path),
        Err(CashflowError::FileIo(_))
    ));
}

#[test]
fn test_failed_save_leaves_destination_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("budget.cashflow");
    let mut session = Session::new_database().unwrap();
    session.save_as(&dest).unwrap();
    let before = fs::read(&dest).unwrap();

    session.add_period("Jan").unwrap();
    let blocked = dir.path().join("not-a-dir");
    fs::write(&blocked, b"file").unwrap();
    let impossible = blocked.join("budget.cashflow");
    assert!(session.save_as(&impossible).is_err());

    assert_eq!(fs::read(&dest).unwrap(), before);
    assert_eq!(session.current_file(), Some(dest.as_path()));
    assert!(session.status().modified);
}
