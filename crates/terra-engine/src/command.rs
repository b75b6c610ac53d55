//! Command queue for zone edits
//!
//! Zone mutations arrive from the host UI at arbitrary times, but the
//! terrain may only change between frames: the parallel generation pass
//! borrows the zone list immutably. Hosts push commands onto the queue
//! and the runtime drains it at the start of the next update.

use tracing::info;

use terra_field::{MoveDirection, Zone};

use crate::terrain::Terrain;

/// One zone edit requested by the host
#[derive(Clone, Debug, PartialEq)]
pub enum TerrainCommand {
    /// Append a noise zone with the given name and select it
    ZoneAdd { name: String },
    /// Remove the active zone, if any
    ZoneRemove,
    /// Move the active zone up or down the blend order
    ZoneMove { direction: MoveDirection },
}

/// A simple command queue the host pushes to and the runtime drains
pub struct CommandQueue {
    commands: Vec<TerrainCommand>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Queue a command for the next update
    pub fn push(&mut self, command: TerrainCommand) {
        self.commands.push(command);
    }

    /// Drain all queued commands, returning them in push order
    pub fn drain(&mut self) -> Vec<TerrainCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

/// Apply one command to the terrain. Returns whether the zone list
/// actually changed; commands with nothing to act on (removing from an
/// empty list, moving past the end) return false and the runtime counts
/// them as warnings.
pub fn apply_command(terrain: &mut Terrain, command: TerrainCommand) -> bool {
    match command {
        TerrainCommand::ZoneAdd { name } => {
            let index = terrain.zones_mut().add(Zone::new(name));
            if let Some(zone) = terrain.zones().get(index) {
                info!(zone = %zone.name, "added zone");
            }
            true
        }
        TerrainCommand::ZoneRemove => match terrain.zones_mut().remove_active() {
            Some(zone) => {
                info!(zone = %zone.name, "removed zone");
                true
            }
            None => false,
        },
        TerrainCommand::ZoneMove { direction } => {
            terrain.zones_mut().move_active(direction)
        }
    }
}
