pub mod fun;
pub mod magyk;
pub mod misc;
pub mod moderation;
pub mod util;

use crate::types::{Data, Error};
use poise::Command;

pub fn all_commands() -> Vec<Command<Data, Error>> {
    let mut commands = Vec::new();

    commands.extend(fun::all_commands());
    commands.extend(moderation::all_commands());
    commands.extend(util::all_commands());
    commands.extend(misc::all_commands());
    commands.extend(magyk::all_commands());

    commands
}
