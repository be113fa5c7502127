use serde_json::{json, Value};

use pagesync::SyncError;

/// Prefix of the final machine-readable stdout line.
pub const RESULT_MARKER: &str = "PAGESYNC_RESULT:";

/// Print the final result line: `PAGESYNC_RESULT: {json}`.
pub fn emit(payload: &Value) {
    println!("{RESULT_MARKER} {payload}");
}

/// Print an error as the final result line.
pub fn emit_error(command: &str, err: &anyhow::Error) {
    let kind = err
        .downcast_ref::<SyncError>()
        .map_or("internal", SyncError::kind);

    let mut payload = json!({
        "command": command,
        "error": format!("{err:#}"),
        "kind": kind,
    });

    if let Some(SyncError::UnknownPage { page, page_count }) = err.downcast_ref::<SyncError>() {
        payload["page"] = json!(page);
        payload["page_count"] = json!(page_count);
    }
    if let Some(SyncError::OracleProcess {
        command: oracle_command,
        status,
        diagnostic,
    }) = err.downcast_ref::<SyncError>()
    {
        payload["oracle_command"] = json!(oracle_command);
        payload["status"] = json!(status);
        payload["diagnostic"] = json!(diagnostic);
    }

    emit(&payload);
}

/// Print a command-line usage error as the final result line.
pub fn emit_usage_error(err: &clap::Error) {
    let rendered = err.to_string();
    let message = rendered.lines().next().unwrap_or_default();

    emit(&json!({
        "command": Value::Null,
        "error": message.trim_start_matches("error: "),
        "kind": "usage",
    }));
}
