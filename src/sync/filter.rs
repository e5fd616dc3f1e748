use std::collections::BTreeMap;

use super::transport::Params;
use super::SyncError;
use crate::core::catalog::match_project;

/// Used when the user has not chosen a filter yet.
pub const DEFAULT_FILTER: &str = "#inbox";

/// The filter text a reload actually uses. Non-blank text is kept verbatim.
pub fn effective_filter(raw: &str) -> &str {
    if raw.trim().is_empty() { DEFAULT_FILTER } else { raw }
}

/// Turn filter text into task-list query parameters.
///
/// Premium accounts get the text as a native `filter` query. Free accounts
/// cannot query, so the text must name a project (`#Work` or `work`) and is
/// resolved to its `project_id`.
pub fn resolve_filter(
    raw: &str,
    is_premium: bool,
    projects: &BTreeMap<u64, String>,
) -> Result<Params, SyncError> {
    let filter = effective_filter(raw);
    let mut params = Params::new();

    if is_premium {
        params.insert("filter".to_string(), filter.to_string());
        return Ok(params);
    }

    let project_id = match_project(projects, filter)
        .ok_or_else(|| SyncError::Resolution(filter.to_string()))?;
    params.insert("project_id".to_string(), project_id.to_string());
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> BTreeMap<u64, String> {
        BTreeMap::from([(1, "#Work".to_string()), (2, "#Inbox".to_string())])
    }

    #[test]
    fn premium_passes_text_through() {
        for raw in ["today | overdue", "#Work & p1", "nope", " padded "] {
            let params = resolve_filter(raw, true, &BTreeMap::new()).unwrap();
            assert_eq!(params, Params::from([("filter".to_string(), raw.to_string())]));
        }
    }

    #[test]
    fn free_tier_resolves_project_by_name() {
        let params = resolve_filter("work", false, &projects()).unwrap();
        assert_eq!(params, Params::from([("project_id".to_string(), "1".to_string())]));

        let params = resolve_filter("#WORK", false, &projects()).unwrap();
        assert_eq!(params.get("project_id").map(String::as_str), Some("1"));
    }

    #[test]
    fn free_tier_unknown_project_names_the_text() {
        let err = resolve_filter("nope", false, &projects()).unwrap_err();
        assert!(matches!(&err, SyncError::Resolution(text) if text == "nope"));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn empty_text_uses_default() {
        let params = resolve_filter("", true, &BTreeMap::new()).unwrap();
        assert_eq!(params.get("filter").map(String::as_str), Some(DEFAULT_FILTER));

        let params = resolve_filter("  ", false, &projects()).unwrap();
        assert_eq!(params.get("project_id").map(String::as_str), Some("2"));
    }
}
