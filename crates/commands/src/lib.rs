//! Command palette: the static command registry and its search.

mod registry;
mod search;

pub use registry::{
    all_commands, find_command, Command, CommandAction, CommandCategory, CommandHandler, COMMANDS,
};
pub use search::{flatten, search_commands, CommandGroup};
