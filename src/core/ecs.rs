use bevy_ecs::prelude::*;

use crate::core::session::{ActionQueue, SessionEventLog};
use crate::session::library::CaseLibrary;
use crate::session::registry::SessionRegistry;
use crate::systems::case_action_system;

/// Build the ECS world with baseline session resources.
pub fn create_world(library: CaseLibrary) -> World {
    let mut world = World::new();
    world.insert_resource(library);
    world.insert_resource(SessionRegistry::default());
    world.insert_resource(ActionQueue::default());
    world.insert_resource(SessionEventLog::default());
    world
}

/// Build the dispatch schedule. A single system applies the queued actions,
/// which keeps every mutation on one writer.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(case_action_system);
    schedule
}
