//! Compose action markers.

use crate::model::{EntityAction, EntityKind};

/// Map a compose action word, in-progress or completed, to its action.
///
/// Words outside the lifecycle vocabulary (`Pulling`, `Waiting`, `Built`,
/// …) return `None`; such lines carry no lifecycle state.
#[must_use]
pub fn classify_action(word: &str) -> Option<EntityAction> {
    let action = match word.trim().to_ascii_lowercase().as_str() {
        "creating" | "created" | "recreate" | "recreating" => EntityAction::Created,
        "starting" | "started" | "running" | "healthy" | "recreated" => EntityAction::Started,
        "stopping" | "stopped" | "killing" | "killed" | "exited" => EntityAction::Stopped,
        "removing" | "removed" => EntityAction::Removed,
        _ => return None,
    };
    Some(action)
}

/// Map the entity noun of an action line.
#[must_use]
pub fn classify_entity_kind(word: &str) -> Option<EntityKind> {
    match word {
        "Container" => Some(EntityKind::Container),
        "Network" => Some(EntityKind::Network),
        "Volume" => Some(EntityKind::Volume),
        "Image" => Some(EntityKind::Image),
        _ => None,
    }
}

/// Status glyphs that mark a step as failed.
#[must_use]
pub fn is_failure_glyph(glyph: &str) -> bool {
    matches!(glyph, "✘" | "✗" | "×" | "!")
}

/// Action words that mark a step as failed.
#[must_use]
pub fn is_failure_word(word: &str) -> bool {
    matches!(word.to_ascii_lowercase().as_str(), "error" | "failed" | "unhealthy")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Created", Some(EntityAction::Created))]
    #[case("Creating", Some(EntityAction::Created))]
    #[case("Recreate", Some(EntityAction::Created))]
    #[case("Started", Some(EntityAction::Started))]
    #[case("Running", Some(EntityAction::Started))]
    #[case("Healthy", Some(EntityAction::Started))]
    #[case("Recreated", Some(EntityAction::Started))]
    #[case("Stopped", Some(EntityAction::Stopped))]
    #[case("Killed", Some(EntityAction::Stopped))]
    #[case("Removed", Some(EntityAction::Removed))]
    #[case("Removing", Some(EntityAction::Removed))]
    #[case("Pulling", None)]
    #[case("Waiting", None)]
    fn test_classify_action(#[case] word: &str, #[case] expected: Option<EntityAction>) {
        assert_eq!(classify_action(word), expected);
    }

    #[test]
    fn test_entity_kinds() {
        assert_eq!(classify_entity_kind("Container"), Some(EntityKind::Container));
        assert_eq!(classify_entity_kind("Network"), Some(EntityKind::Network));
        assert_eq!(classify_entity_kind("container"), None);
    }

    #[test]
    fn test_failure_markers() {
        assert!(is_failure_glyph("✘"));
        assert!(!is_failure_glyph("✔"));
        assert!(is_failure_word("Error"));
        assert!(!is_failure_word("Started"));
    }
}
