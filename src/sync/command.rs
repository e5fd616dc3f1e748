use serde::Serialize;
use uuid::Uuid;

/// One entry of a sync-API `commands` list.
#[derive(Debug, Serialize)]
struct Command<'a, A: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    args: &'a A,
    uuid: Uuid,
    temp_id: Uuid,
}

/// Wrap an action in the sync API's command-list JSON: a one-element array
/// holding `type`, `args` and two fresh identifiers (`uuid`, `temp_id`).
///
/// Returns an empty string when `args` cannot be encoded; callers must not
/// send an empty envelope.
pub fn make_command<A: Serialize>(kind: &str, args: &A) -> String {
    let command = Command {
        kind,
        args,
        uuid: Uuid::new_v4(),
        temp_id: Uuid::new_v4(),
    };

    match serde_json::to_string(&[command]) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to encode {} command: {}", kind, e);
            String::new()
        }
    }
}
