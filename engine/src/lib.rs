//! Game logic layer machinery.

/// How far can actors see.
pub const FOV_RADIUS: i32 = 10;

/// Time cost of a standard action.
pub const TURN_COST: i64 = 100;

/// Reschedule delay for an AI actor whose action came out impossible.
///
/// Keeps a perpetually blocked actor from starving the turn queue.
pub const RETRY_DELAY: i64 = 100;

mod action;
pub use action::{Action, ActionResult, PlanResult, StairDir, Success};

mod combat;

pub mod ecs;

mod entity;
pub use entity::Entity;

mod fov;
pub use crate::fov::ActiveFov;

mod map;
pub use map::{Map, MapAttr};

mod mapgen;
pub use mapgen::MapKey;

mod memory;
pub use memory::{Memory, MemoryLayer};

mod monsters;
pub use monsters::{monster_type, spawn_monster, MonsterType, BESTIARY};

mod msg;
pub use msg::{Message, MessageLog};

pub mod prelude;

mod runtime;
pub use runtime::{Runtime, ScenarioStatus};

mod sched;
pub use sched::{Instant, Ticket, TurnQueue};

mod tile;
pub use tile::{Rgb, TileData, TileId, TileRegistry};
