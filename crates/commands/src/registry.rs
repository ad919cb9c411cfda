use contour_detect::ModuleId;
use serde::Serialize;

/// Palette section. Groups are listed in the order their first command
/// appears in [`COMMANDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Math,
    Time,
    Text,
    Tools,
    Chat,
    App,
}

impl CommandCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CommandCategory::Math => "Math",
            CommandCategory::Time => "Time",
            CommandCategory::Text => "Text",
            CommandCategory::Tools => "Tools",
            CommandCategory::Chat => "Chat",
            CommandCategory::App => "App",
        }
    }
}

/// Direct actions handled by the host rather than the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandAction {
    NewChat,
    ChatHistory,
    Settings,
    GroupSettings,
    Help,
}

impl CommandAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CommandAction::NewChat => "new-chat",
            CommandAction::ChatHistory => "chat-history",
            CommandAction::Settings => "settings",
            CommandAction::GroupSettings => "group-settings",
            CommandAction::Help => "help",
        }
    }
}

/// What selecting a command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum CommandHandler {
    /// Open the module in focused mode.
    Module(ModuleId),
    /// Ask the host to perform an action.
    Action(CommandAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Command {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub icon: &'static str,
    pub handler: CommandHandler,
}

const fn module(
    id: ModuleId,
    name: &'static str,
    description: &'static str,
    category: CommandCategory,
    icon: &'static str,
) -> Command {
    Command {
        id: id.as_str(),
        name,
        description,
        category,
        icon,
        handler: CommandHandler::Module(id),
    }
}

const fn action(
    action: CommandAction,
    name: &'static str,
    description: &'static str,
    category: CommandCategory,
    icon: &'static str,
) -> Command {
    Command {
        id: action.as_str(),
        name,
        description,
        category,
        icon,
        handler: CommandHandler::Action(action),
    }
}

/// Every command, in registration order.
pub const COMMANDS: &[Command] = &[
    module(
        ModuleId::Calculator,
        "Calculator",
        "Evaluate math expressions",
        CommandCategory::Math,
        "calculator",
    ),
    module(
        ModuleId::Units,
        "Unit Converter",
        "Convert length, weight, temperature and more",
        CommandCategory::Math,
        "ruler",
    ),
    module(
        ModuleId::Currency,
        "Currency Converter",
        "Convert between currencies at live rates",
        CommandCategory::Math,
        "coins",
    ),
    module(
        ModuleId::Timezone,
        "Time Zones",
        "Convert a clock reading between zones",
        CommandCategory::Time,
        "globe",
    ),
    module(
        ModuleId::Date,
        "Date Calculator",
        "Days until, days since, dates from now",
        CommandCategory::Time,
        "calendar",
    ),
    module(
        ModuleId::Timer,
        "Timer",
        "Countdown with pause and reset",
        CommandCategory::Time,
        "hourglass",
    ),
    module(
        ModuleId::WordCount,
        "Word Count",
        "Count words, characters and sentences",
        CommandCategory::Text,
        "text",
    ),
    module(
        ModuleId::Translator,
        "Translate",
        "Translate text to another language",
        CommandCategory::Text,
        "languages",
    ),
    module(
        ModuleId::Dictionary,
        "Dictionary",
        "Look up the definition of a word",
        CommandCategory::Text,
        "book",
    ),
    module(
        ModuleId::Color,
        "Color",
        "Parse hex, rgb, hsl or named colors",
        CommandCategory::Tools,
        "palette",
    ),
    module(
        ModuleId::Random,
        "Random",
        "Roll dice, flip a coin or pick a number",
        CommandCategory::Tools,
        "dice",
    ),
    action(
        CommandAction::NewChat,
        "New Chat",
        "Start a new conversation",
        CommandCategory::Chat,
        "plus",
    ),
    action(
        CommandAction::ChatHistory,
        "Chat History",
        "Browse previous conversations",
        CommandCategory::Chat,
        "history",
    ),
    action(
        CommandAction::GroupSettings,
        "Group Settings",
        "Manage members of this group",
        CommandCategory::Chat,
        "users",
    ),
    action(
        CommandAction::Settings,
        "Settings",
        "Account and app preferences",
        CommandCategory::App,
        "settings",
    ),
    action(
        CommandAction::Help,
        "Help",
        "Show what the composer understands",
        CommandCategory::App,
        "help-circle",
    ),
];

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

/// Look up a command by id.
pub fn find_command(id: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = COMMANDS.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), COMMANDS.len());
    }

    #[test]
    fn test_every_module_has_a_command() {
        for id in ModuleId::ALL {
            let command = find_command(id.as_str()).unwrap();
            assert_eq!(command.handler, CommandHandler::Module(id));
        }
    }

    #[test]
    fn test_handler_serialization() {
        let json = serde_json::to_value(find_command("word-count").unwrap()).unwrap();
        assert_eq!(json["handler"]["kind"], "module");
        assert_eq!(json["handler"]["target"], "word-count");
        assert_eq!(json["category"], "text");
    }
}
