//! Per-actor recollection of terrain and objects seen earlier.

use util::{Grid, HashMap};

use crate::{ecs::Position, prelude::*};

/// What one actor remembers about one map.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct MemoryLayer {
    /// Last seen terrain, void for never-seen cells.
    pub tiles: Grid<TileId>,
    /// Last seen position of remembered objects. An object appears at
    /// most once, re-sighting it elsewhere moves the record.
    pub objs: HashMap<Position, Entity>,
}

impl MemoryLayer {
    /// Record everything currently in view. Stale object records inside
    /// the field of view are dropped.
    pub fn absorb(
        &mut self,
        tiles: &Grid<TileId>,
        visible: &Grid<bool>,
        seen_objs: &[(Position, Entity)],
    ) {
        // Layers started before the map existed, or after a map was
        // regenerated with new dimensions, restart from scratch.
        if self.tiles.dim() != tiles.dim() {
            *self = MemoryLayer {
                tiles: Grid::new(
                    tiles.width(),
                    tiles.height(),
                    TileId::VOID,
                ),
                objs: Default::default(),
            };
        }

        for (p, &lit) in visible.iter() {
            if !lit {
                continue;
            }
            self.tiles[p] = tiles[p];
            self.objs.remove(&Position(p));
        }

        // Re-sighted objects move to their new position.
        for &(pos, e) in seen_objs {
            self.objs.retain(|_, &mut v| v != e);
            self.objs.insert(pos, e);
        }
    }
}

/// Component that holds an actor's map memories.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Memory {
    pub layers: HashMap<MapKey, MemoryLayer>,
}

impl Memory {
    pub fn layer(&self, key: MapKey) -> Option<&MemoryLayer> {
        self.layers.get(&key)
    }
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;

    #[test]
    fn dimension_mismatch_resets_the_layer() {
        let mut layer = MemoryLayer {
            tiles: Grid::new(4, 4, TileId(1)),
            objs: Default::default(),
        };
        let tiles = Grid::new(6, 6, TileId(2));
        let mut visible = Grid::new(6, 6, false);
        visible[ivec2(0, 0)] = true;

        layer.absorb(&tiles, &visible, &[]);
        assert_eq!(layer.tiles.dim(), ivec2(6, 6));
        assert_eq!(layer.tiles[ivec2(0, 0)], TileId(2));
        assert_eq!(layer.tiles[ivec2(5, 5)], TileId::VOID);
    }
}
