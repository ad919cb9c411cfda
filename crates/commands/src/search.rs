use crate::{Command, CommandCategory, COMMANDS};
use serde::Serialize;
use tracing::trace;

/// Commands sharing a category, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandGroup {
    pub category: CommandCategory,
    pub commands: Vec<Command>,
}

fn matches(command: &Command, needle: &str) -> bool {
    [command.name, command.description, command.category.label()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Case-insensitive substring search over name, description and category.
///
/// An empty query returns the whole registry. Results are grouped by
/// category, groups ordered by first registration.
pub fn search_commands(query: &str) -> Vec<CommandGroup> {
    let needle = query.trim().to_lowercase();
    let mut groups: Vec<CommandGroup> = Vec::new();

    for command in COMMANDS.iter().filter(|c| matches(c, &needle)) {
        match groups.iter_mut().find(|g| g.category == command.category) {
            Some(group) => group.commands.push(*command),
            None => groups.push(CommandGroup {
                category: command.category,
                commands: vec![*command],
            }),
        }
    }

    trace!(query = %needle, groups = groups.len(), "Searched commands");
    groups
}

/// The list that palette selection indexes into.
pub fn flatten(groups: &[CommandGroup]) -> Vec<Command> {
    groups
        .iter()
        .flat_map(|g| g.commands.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_everything_grouped() {
        let groups = search_commands("");
        assert_eq!(flatten(&groups).len(), COMMANDS.len());
        let categories: Vec<_> = groups.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            vec![
                CommandCategory::Math,
                CommandCategory::Time,
                CommandCategory::Text,
                CommandCategory::Tools,
                CommandCategory::Chat,
                CommandCategory::App,
            ]
        );
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let ids: Vec<_> = flatten(&search_commands("TIM")).iter().map(|c| c.id).collect();
        assert!(ids.contains(&"timer"));
        assert!(ids.contains(&"timezone"));
        assert!(!ids.contains(&"calculator"));
    }

    #[test]
    fn test_matches_description_and_category() {
        let ids: Vec<_> = flatten(&search_commands("dice")).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["random"]);

        let ids: Vec<_> = flatten(&search_commands("chat")).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["new-chat", "chat-history", "group-settings"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(search_commands("zzz").is_empty());
    }
}
