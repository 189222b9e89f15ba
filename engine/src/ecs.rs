//! Component types.
//!
//! All components implement `Clone + Default + PartialEq` so the entity
//! accessors can treat a missing component as the default value and
//! elide storing default values.

use derive_more::{Deref, DerefMut};
use glam::IVec2;

use crate::{
    prelude::*,
    sched::Ticket,
    tile::Rgb,
};

#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug,
)]
pub struct Position(pub IVec2);

impl std::ops::Add<IVec2> for Position {
    type Output = Position;

    fn add(self, rhs: IVec2) -> Self::Output {
        Position(self.0 + rhs)
    }
}

impl From<Position> for IVec2 {
    fn from(p: Position) -> Self {
        p.0
    }
}

/// Which level an entity is on.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
pub struct OnMap(pub MapKey);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Glyph {
    pub ch: char,
    pub fg: Rgb,
}

impl Default for Glyph {
    fn default() -> Self {
        Glyph {
            ch: '?',
            fg: Rgb::default(),
        }
    }
}

#[derive(Clone, Default, Eq, PartialEq, Debug, Deref, DerefMut)]
pub struct Name(pub String);

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Health {
    pub hp: i32,
    pub max_hp: i32,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Health { hp: max_hp, max_hp }
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Deref, DerefMut)]
pub struct Attack(pub i32);

/// Marks an entity that takes turns. Cleared on death.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Deref, DerefMut)]
pub struct IsActor(pub bool);

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug, Deref, DerefMut)]
pub struct IsPlayer(pub bool);

/// A level transition standing on the entity's position.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Stairway {
    pub up: Option<MapKey>,
    pub down: Option<MapKey>,
}

/// NPC decision style.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub enum Brain {
    /// Takes no actions. The consuming loop treats an inert scheduled
    /// entity as the player awaiting input.
    #[default]
    Inert,
    RandomWalk,
    SeekPlayer,
}

impl Brain {
    pub fn action(self) -> Option<Action> {
        match self {
            Brain::Inert => None,
            Brain::RandomWalk => Some(Action::RandomWalk),
            Brain::SeekPlayer => Some(Action::SeekPlayer),
        }
    }
}

/// The one ticket in the turn queue that currently speaks for this
/// entity. Queue entries that don't match it are stale.
#[derive(Clone, Default, Eq, PartialEq, Debug, Deref, DerefMut)]
pub struct LiveTicket(pub Option<Ticket<Entity>>);

/// ECS storage newtype.
#[derive(Default, Deref, DerefMut)]
pub struct Ecs(pub(crate) hecs::World);
