//! `docker compose up|down|start|stop` progress decoding.
//!
//! Two line shapes are recognized, newest first:
//!
//! ```text
//!  ✔ Container app-web-1  Started        0.5s
//!  ✘ Container app-db-1   Error
//! Creating app_web_1 ... done
//! Removing network app_default
//! ```
//!
//! Progress is repeated as entities move through their lifecycle, so
//! records are keyed by `(kind, name)` and the last action wins. Compose
//! writes progress to standard error; both streams are scanned.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::lines::{content_lines, strip_ansi};
use super::RawOutput;
use crate::aggregate::summarize_compose;
use crate::classify::{classify_action, classify_entity_kind, is_failure_glyph, is_failure_word};
use crate::model::{ComposeEntity, ComposeResult, EntityKind};
use crate::normalize::duration_to_seconds;

static PROGRESS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?P<glyph>[^\sA-Za-z0-9])\s+)?(?P<kind>Container|Network|Volume|Image)\s+(?P<name>\S+)\s+(?P<word>[A-Za-z]+)(?:\s+(?P<elapsed>\d+(?:\.\d+)?s))?\s*$",
    )
    .expect("progress pattern is valid")
});

static LEGACY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<word>Creating|Recreating|Starting|Stopping|Killing|Removing)\s+(?:(?P<kind>network|volume)\s+)?"?(?P<name>[^\s"]+)"?(?:.*?\.\.\.\s+(?P<outcome>done|error))?"#,
    )
    .expect("legacy pattern is valid")
});

/// Aggregate progress banner, e.g. `[+] Running 2/3`.
const RUNNING_BANNER: &str = "[+]";

/// One recognized action line.
#[derive(Debug, Clone, PartialEq)]
struct ActionLine {
    kind: EntityKind,
    name: String,
    word: String,
    failed: bool,
    elapsed_seconds: Option<f64>,
}

fn parse_action_line(line: &str) -> Option<ActionLine> {
    if let Some(caps) = PROGRESS_LINE.captures(line) {
        let kind = classify_entity_kind(&caps["kind"])?;
        let word = caps["word"].to_string();
        let glyph_failed = caps.name("glyph").is_some_and(|g| is_failure_glyph(g.as_str()));
        return Some(ActionLine {
            kind,
            name: caps["name"].trim_matches('"').to_string(),
            failed: glyph_failed || is_failure_word(&word),
            word,
            elapsed_seconds: caps.name("elapsed").map(|m| duration_to_seconds(m.as_str())),
        });
    }

    let caps = LEGACY_LINE.captures(line)?;
    let kind = match caps.name("kind").map(|m| m.as_str()) {
        Some("network") => EntityKind::Network,
        Some("volume") => EntityKind::Volume,
        _ => EntityKind::Container,
    };
    Some(ActionLine {
        kind,
        name: caps["name"].to_string(),
        word: caps["word"].to_string(),
        failed: caps.name("outcome").is_some_and(|m| m.as_str() == "error"),
        elapsed_seconds: None,
    })
}

/// Decode compose progress output.
#[must_use]
pub fn decode(raw: &RawOutput) -> ComposeResult {
    let mut entities: IndexMap<(EntityKind, String), ComposeEntity> = IndexMap::new();
    let mut leftover_stderr = Vec::new();

    let stdout_lines = content_lines(&raw.stdout).map(|l| (false, l));
    let stderr_lines = content_lines(&raw.stderr).map(|l| (true, l));

    for (from_stderr, line) in stdout_lines.chain(stderr_lines) {
        let line = strip_ansi(line);
        if line.trim_start().starts_with(RUNNING_BANNER) {
            continue;
        }
        let Some(action_line) = parse_action_line(&line) else {
            if from_stderr {
                leftover_stderr.push(line.trim().to_string());
            }
            continue;
        };
        apply(&mut entities, action_line);
    }

    let entities: Vec<ComposeEntity> = entities.into_values().collect();
    let summary = summarize_compose(&entities);
    let error = if raw.success() || leftover_stderr.is_empty() {
        None
    } else {
        Some(leftover_stderr.join("\n"))
    };

    ComposeResult {
        success: raw.success(),
        entities,
        summary,
        error,
    }
}

fn apply(entities: &mut IndexMap<(EntityKind, String), ComposeEntity>, line: ActionLine) {
    let action = classify_action(&line.word);
    let key = (line.kind, line.name);

    if action.is_none() && !line.failed && !entities.contains_key(&key) {
        trace!(word = %line.word, name = %key.1, "No lifecycle state in line, skipping");
        return;
    }

    let entity = entities.entry(key).or_insert_with_key(|(kind, name)| ComposeEntity {
        kind: *kind,
        name: name.clone(),
        action: None,
        transitions: Vec::new(),
        failed: false,
        elapsed_seconds: None,
    });

    if let Some(action) = action {
        entity.action = Some(action);
        if entity.transitions.last() != Some(&action) {
            entity.transitions.push(action);
        }
    }
    if line.failed {
        entity.failed = true;
    }
    if line.elapsed_seconds.is_some() {
        entity.elapsed_seconds = line.elapsed_seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityAction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_progress_lines_deduplicated() {
        let stderr = "\
 Network app_default  Creating
 Network app_default  Created
 Container app-web-1  Creating
 Container app-web-1  Created
 Container app-web-1  Starting
 Container app-web-1  Started
";
        let result = decode(&RawOutput::new("").with_stderr(stderr));
        assert!(result.success);
        assert_eq!(result.entities.len(), 2);

        let web = &result.entities[1];
        assert_eq!(web.kind, EntityKind::Container);
        assert_eq!(web.name, "app-web-1");
        assert_eq!(web.action, Some(EntityAction::Started));
        assert_eq!(web.transitions, vec![EntityAction::Created, EntityAction::Started]);

        assert_eq!(result.summary.total, 2);
        assert_eq!(result.summary.created, 1);
        assert_eq!(result.summary.started, 1);
    }

    #[test]
    fn test_glyph_and_elapsed() {
        let stderr = " ✔ Container app-db-1  Started  1.2s\n ✘ Container app-api-1  Error  0.3s\n";
        let result = decode(&RawOutput::new("").with_stderr(stderr).with_exit_code(1));
        assert!(!result.success);
        assert_eq!(result.entities[0].elapsed_seconds, Some(1.2));
        assert!(!result.entities[0].failed);
        assert!(result.entities[1].failed);
        assert_eq!(result.entities[1].action, None);
        assert_eq!(result.summary.failed, 1);
    }

    #[test]
    fn test_banner_and_quoted_volume() {
        let stderr = "[+] Running 1/1\n Volume \"app_data\"  Created\n";
        let result = decode(&RawOutput::new("").with_stderr(stderr).with_exit_code(1));
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].kind, EntityKind::Volume);
        assert_eq!(result.entities[0].name, "app_data");
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_legacy_lines() {
        let stdout = "Creating network \"app_default\" with the default driver\nCreating app_web_1 ... done\nCreating app_db_1  ... error\n";
        let result = decode(&RawOutput::new(stdout));
        assert_eq!(result.entities.len(), 3);
        assert_eq!(result.entities[0].kind, EntityKind::Network);
        assert_eq!(result.entities[0].name, "app_default");
        assert_eq!(result.entities[1].action, Some(EntityAction::Created));
        assert!(result.entities[2].failed);
    }

    #[test]
    fn test_error_collected_from_unrecognized_stderr() {
        let stderr = " Container app-web-1  Creating\nError response from daemon: port is already allocated\n";
        let result = decode(&RawOutput::new("").with_stderr(stderr).with_exit_code(1));
        assert_eq!(
            result.error.as_deref(),
            Some("Error response from daemon: port is already allocated")
        );
    }

    #[test]
    fn test_non_lifecycle_words_ignored() {
        let stderr = " Image postgres:16  Pulling\n Image postgres:16  Pulled\n";
        let result = decode(&RawOutput::new("").with_stderr(stderr));
        assert!(result.entities.is_empty());
    }

    #[test]
    fn test_down_sequence() {
        let stderr = " Container app-web-1  Stopping\n Container app-web-1  Stopped\n Container app-web-1  Removing\n Container app-web-1  Removed\n";
        let result = decode(&RawOutput::new("").with_stderr(stderr));
        let web = &result.entities[0];
        assert_eq!(web.action, Some(EntityAction::Removed));
        assert_eq!(web.transitions, vec![EntityAction::Stopped, EntityAction::Removed]);
        assert_eq!(result.summary.removed, 1);
    }
}
