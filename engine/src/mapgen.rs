//! Level generation.

use glam::{ivec2, IVec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ecs::*,
    map::MapAttr,
    monsters::{spawn_monster, BESTIARY},
    prelude::*,
};

/// Identifier of a generatable level.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
pub enum MapKey {
    /// The safe starting level.
    #[default]
    Hub,
    /// N-th cave level below the hub.
    Caves(u16),
}

impl MapKey {
    pub fn above(self) -> Option<MapKey> {
        match self {
            MapKey::Hub => None,
            MapKey::Caves(0) => Some(MapKey::Hub),
            MapKey::Caves(n) => Some(MapKey::Caves(n - 1)),
        }
    }

    pub fn below(self) -> MapKey {
        match self {
            MapKey::Hub => MapKey::Caves(0),
            MapKey::Caves(n) => MapKey::Caves(n + 1),
        }
    }
}

const HUB_DIM: IVec2 = ivec2(50, 50);
const CAVE_DIM: IVec2 = ivec2(40, 40);
const CAVE_MONSTERS: usize = 10;

/// Cells already claimed by a spawned feature or creature.
const CLAIMED: MapAttr<bool> = MapAttr::new("claimed", false);

/// Build the level for `key` and populate it with features and
/// monsters. The generated map is registered in the runtime.
pub fn generate(r: &mut Runtime, key: MapKey) {
    match key {
        MapKey::Hub => hub(r),
        MapKey::Caves(_) => caves(r, key),
    }
}

fn floored_box(r: &Runtime, dim: IVec2) -> Map {
    let floor = r.tiles.id("floor").unwrap_or_default();
    let wall = r.tiles.id("wall").unwrap_or_default();
    let mut map = Map::new(dim.x, dim.y);
    for (p, t) in map.tiles_mut().iter_mut() {
        let edge = p.x == 0
            || p.y == 0
            || p.x == dim.x - 1
            || p.y == dim.y - 1;
        *t = if edge { wall } else { floor };
    }
    map
}

fn hub(r: &mut Runtime) {
    let map = floored_box(r, HUB_DIM);
    r.insert_map(MapKey::Hub, map);

    let down = free_cell(r, MapKey::Hub);
    spawn_stairway(
        r,
        MapKey::Hub,
        down,
        Stairway {
            up: None,
            down: Some(MapKey::Hub.below()),
        },
    );
}

fn caves(r: &mut Runtime, key: MapKey) {
    let mut map = floored_box(r, CAVE_DIM);
    let wall = r.tiles.id("wall").unwrap_or_default();

    // Scattered rubble. Border walls keep the level closed whatever
    // the scatter does.
    let n_rocks =
        (CAVE_DIM.x * CAVE_DIM.y) as usize / 8;
    for _ in 0..n_rocks {
        let p = ivec2(
            r.rng.gen_range(1..CAVE_DIM.x - 1),
            r.rng.gen_range(1..CAVE_DIM.y - 1),
        );
        map.tiles_mut()[p] = wall;
    }
    r.insert_map(key, map);

    let up_pos = free_cell(r, key);
    spawn_stairway(
        r,
        key,
        up_pos,
        Stairway {
            up: key.above(),
            down: None,
        },
    );
    let down_pos = free_cell(r, key);
    spawn_stairway(
        r,
        key,
        down_pos,
        Stairway {
            up: None,
            down: Some(key.below()),
        },
    );

    for _ in 0..CAVE_MONSTERS {
        let kind = BESTIARY[r.rng.gen_range(0..BESTIARY.len())];
        let pos = free_cell(r, key);
        spawn_monster(r, &kind, key, pos);
    }
}

pub fn spawn_stairway(
    r: &mut Runtime,
    key: MapKey,
    pos: impl Into<IVec2>,
    stairs: Stairway,
) -> Entity {
    let pos = pos.into();
    let ch = if stairs.down.is_some() { '>' } else { '<' };
    let e = Entity(r.ecs.spawn((
        Position(pos),
        OnMap(key),
        stairs,
        Glyph {
            ch,
            ..Default::default()
        },
    )));
    if let Some(map) = r.map_mut(key) {
        if map.contains(pos) {
            map.layer(&CLAIMED)[pos] = true;
        }
    }
    e
}

/// Random walkable, unclaimed cell. Claims the cell.
///
/// Generated levels always have far more open floor than spawned
/// features, so rejection sampling terminates fast.
pub fn free_cell(r: &mut Runtime, key: MapKey) -> IVec2 {
    let Some(dim) = r.map(key).map(|m| m.dim()) else {
        return IVec2::ZERO;
    };
    loop {
        let p = ivec2(
            r.rng.gen_range(0..dim.x),
            r.rng.gen_range(0..dim.y),
        );

        let tile = match r.map(key) {
            Some(m) => m.tiles()[p],
            None => return IVec2::ZERO,
        };
        if r.tiles.get(tile).walk_cost == 0 {
            continue;
        }

        let Some(map) = r.map_mut(key) else {
            return IVec2::ZERO;
        };
        if map.layer(&CLAIMED)[p] {
            continue;
        }
        map.layer(&CLAIMED)[p] = true;
        return p;
    }
}
