//! Cached per-actor fields of view.

use util::{chebyshev_len, Grid};

use crate::{ecs::*, memory::Memory, prelude::*, FOV_RADIUS};

/// Snapshot of what an actor saw the last time its field of view was
/// computed, keyed by where it was standing. Recomputed only when the
/// key no longer matches.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct ActiveFov {
    pub map: MapKey,
    pub pos: Position,
    pub visible: Grid<bool>,
}

impl ActiveFov {
    pub fn is_valid_for(&self, map: MapKey, pos: Position) -> bool {
        !self.visible.is_empty() && self.map == map && self.pos == pos
    }
}

impl Runtime {
    fn transparency(&self, key: MapKey) -> Option<Grid<bool>> {
        let map = self.map(key)?;
        let mut ret =
            Grid::new(map.width(), map.height(), false);
        for (p, &tile) in map.tiles().iter() {
            ret[p] = self.tiles.get(tile).transparent;
        }
        Some(ret)
    }

    fn visible_cells(
        &self,
        key: MapKey,
        origin: Position,
    ) -> Option<Grid<bool>> {
        let transparency = self.transparency(key)?;
        let mut visible = Grid::new(
            transparency.width(),
            transparency.height(),
            false,
        );
        fov::compute(
            (origin.0.x, origin.0.y),
            FOV_RADIUS,
            &mut |x, y| {
                transparency
                    .get([x, y])
                    .copied()
                    .unwrap_or(false)
            },
            &mut |x, y| {
                if let Some(c) = visible.get_mut([x, y]) {
                    *c = true;
                }
            },
        );
        Some(visible)
    }

    /// Recompute an actor's field of view if it has gone stale, and
    /// when `update_memory` is set, fold the sighting into the actor's
    /// memory. A cache hit returns the stored snapshot untouched.
    pub fn refresh_fov(
        &mut self,
        e: Entity,
        update_memory: bool,
    ) -> ActiveFov {
        let cached = e.get::<ActiveFov>(self);
        let Some(pos) = e.pos(self) else { return cached };
        let key = e.on_map(self);

        if cached.is_valid_for(key, pos) {
            return cached;
        }

        let Some(visible) = self.visible_cells(key, pos) else {
            return cached;
        };

        if update_memory {
            // Sighted objects, the observer itself is not recorded.
            let mut seen = Vec::new();
            for (h, (&p, &OnMap(m), _)) in self
                .ecs
                .query::<(&Position, &OnMap, &Glyph)>()
                .iter()
            {
                let obj = Entity(h);
                if m == key
                    && obj != e
                    && visible.get(p.0).copied().unwrap_or(false)
                {
                    seen.push((p, obj));
                }
            }

            if let Some(map) = self.map(key) {
                let tiles = map.tiles().clone();
                e.with_mut::<Memory, _>(self, |mem| {
                    mem.layers
                        .entry(key)
                        .or_default()
                        .absorb(&tiles, &visible, &seen);
                });
            }
        }

        let snapshot = ActiveFov {
            map: key,
            pos,
            visible,
        };
        e.set(self, snapshot.clone());
        snapshot
    }

    /// Closest player the entity can currently see, without touching
    /// any caches.
    pub fn nearest_visible_player(&self, e: Entity) -> Option<Entity> {
        let pos = e.pos(self)?;
        let key = e.on_map(self);
        let visible = self.visible_cells(key, pos)?;

        let mut best: Option<(i32, Entity)> = None;
        for (h, (&p, &OnMap(m), &IsPlayer(player), &IsActor(actor))) in
            self.ecs
                .query::<(&Position, &OnMap, &IsPlayer, &IsActor)>()
                .iter()
        {
            if !player || !actor || m != key {
                continue;
            }
            if !visible.get(p.0).copied().unwrap_or(false) {
                continue;
            }
            let d = chebyshev_len(p.0 - pos.0);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, Entity(h)));
            }
        }
        best.map(|(_, e)| e)
    }
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;
    use crate::{Map, Memory};

    fn walled_room(r: &Runtime, w: i32, h: i32) -> Map {
        let mut map = Map::new(w, h);
        let floor = r.tiles.id("floor").unwrap();
        let wall = r.tiles.id("wall").unwrap();
        for (p, t) in map.tiles_mut().iter_mut() {
            let edge = p.x == 0
                || p.y == 0
                || p.x == w - 1
                || p.y == h - 1;
            *t = if edge { wall } else { floor };
        }
        map
    }

    #[test]
    fn fov_is_cached_until_the_actor_moves() {
        let mut r = Runtime::default();
        let map = walled_room(&r, 8, 8);
        r.insert_map(MapKey::Hub, map);
        r.activate_map(MapKey::Hub);
        let e = r.new_actor(MapKey::Hub, ivec2(3, 3));

        r.refresh_fov(e, true);
        let first = e.get::<ActiveFov>(&r);
        assert!(first.visible[ivec2(3, 3)]);

        // Same position, the cached value is reused as-is.
        r.refresh_fov(e, true);
        assert_eq!(e.get::<ActiveFov>(&r), first);

        e.place(&mut r, Position(ivec2(4, 3)));
        r.refresh_fov(e, true);
        let second = e.get::<ActiveFov>(&r);
        assert_ne!(second.pos, first.pos);
        assert!(second.visible[ivec2(4, 3)]);
    }

    #[test]
    fn sightings_land_in_memory_and_move_on_resight() {
        let mut r = Runtime::default();
        let map = walled_room(&r, 8, 8);
        r.insert_map(MapKey::Hub, map);
        r.activate_map(MapKey::Hub);
        let e = r.new_actor(MapKey::Hub, ivec2(3, 3));
        let other = r.new_actor(MapKey::Hub, ivec2(5, 3));

        r.refresh_fov(e, true);
        let mem = e.get::<Memory>(&r);
        let layer = mem.layer(MapKey::Hub).unwrap();
        assert_eq!(
            layer.objs.get(&Position(ivec2(5, 3))),
            Some(&other)
        );
        assert_eq!(
            layer.tiles[ivec2(3, 3)],
            r.tiles.id("floor").unwrap()
        );

        // The other actor moves and is seen again, the old record
        // goes away.
        other.place(&mut r, Position(ivec2(5, 4)));
        e.place(&mut r, Position(ivec2(3, 4)));
        r.refresh_fov(e, true);
        let mem = e.get::<Memory>(&r);
        let layer = mem.layer(MapKey::Hub).unwrap();
        assert_eq!(layer.objs.get(&Position(ivec2(5, 3))), None);
        assert_eq!(
            layer.objs.get(&Position(ivec2(5, 4))),
            Some(&other)
        );
    }

    #[test]
    fn fov_without_memory_update_records_nothing() {
        let mut r = Runtime::default();
        let map = walled_room(&r, 8, 8);
        r.insert_map(MapKey::Hub, map);
        r.activate_map(MapKey::Hub);
        let e = r.new_actor(MapKey::Hub, ivec2(3, 3));
        r.new_actor(MapKey::Hub, ivec2(5, 3));

        let snap = r.refresh_fov(e, false);
        assert!(snap.visible[ivec2(5, 3)]);
        assert!(e.get::<Memory>(&r).layer(MapKey::Hub).is_none());
    }

    #[test]
    fn players_behind_walls_are_not_seen() {
        let mut r = Runtime::default();
        let mut map = walled_room(&r, 12, 5);
        let wall = r.tiles.id("wall").unwrap();
        for y in 1..4 {
            map.tiles_mut()[ivec2(6, y)] = wall;
        }
        r.insert_map(MapKey::Hub, map);
        r.activate_map(MapKey::Hub);

        let npc = r.new_actor(MapKey::Hub, ivec2(2, 2));
        let player = r.spawn_player(MapKey::Hub, ivec2(9, 2));

        assert_eq!(r.nearest_visible_player(npc), None);

        // Knock a hole in the dividing wall.
        let floor = r.tiles.id("floor").unwrap();
        r.map_mut(MapKey::Hub).unwrap().tiles_mut()
            [ivec2(6, 2)] = floor;
        assert_eq!(r.nearest_visible_player(npc), Some(player));
    }
}
