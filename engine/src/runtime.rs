use anyhow::{bail, Result};
use glam::IVec2;
use rand::SeedableRng;
use util::{GameRng, HashMap};

use crate::{
    ecs::*,
    mapgen,
    memory::Memory,
    prelude::*,
    sched::TurnQueue,
    tile::{Rgb, TileRegistry},
    RETRY_DELAY,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ScenarioStatus {
    Ongoing,
    /// The player is dead, the simulation has stopped advancing.
    Lost,
}

/// Complete simulation state.
pub struct Runtime {
    pub(crate) ecs: Ecs,
    sched: TurnQueue<Entity>,
    pub tiles: TileRegistry,
    maps: HashMap<MapKey, Map>,
    active_map: MapKey,
    player: Option<Entity>,
    pub rng: GameRng,
    pub msg: MessageLog,
}

impl AsRef<Runtime> for Runtime {
    fn as_ref(&self) -> &Runtime {
        self
    }
}

impl AsMut<Runtime> for Runtime {
    fn as_mut(&mut self) -> &mut Runtime {
        self
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime {
            ecs: Default::default(),
            sched: Default::default(),
            tiles: TileRegistry::with_standard_tiles(),
            maps: Default::default(),
            active_map: Default::default(),
            player: None,
            rng: GameRng::seed_from_u64(0xdead_beef),
            msg: Default::default(),
        }
    }
}

impl Runtime {
    /// Start a new game: generate the hub level and put the player in
    /// it.
    pub fn new(seed: u64) -> Result<Self> {
        let mut r = Runtime {
            rng: GameRng::seed_from_u64(seed),
            ..Default::default()
        };
        mapgen::generate(&mut r, MapKey::Hub);
        if r.map(MapKey::Hub).is_none() {
            bail!("starting level failed to generate");
        }
        let start = mapgen::free_cell(&mut r, MapKey::Hub);
        r.spawn_player(MapKey::Hub, start);
        log::info!("new game, seed {seed}");
        Ok(r)
    }

    pub fn now(&self) -> Instant {
        self.sched.now()
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn map(&self, key: MapKey) -> Option<&Map> {
        self.maps.get(&key)
    }

    pub fn map_mut(&mut self, key: MapKey) -> Option<&mut Map> {
        self.maps.get_mut(&key)
    }

    pub fn insert_map(&mut self, key: MapKey, map: Map) {
        self.maps.insert(key, map);
    }

    /// Fetch a map, generating it on first access.
    pub fn get_map(&mut self, key: MapKey) -> &Map {
        if !self.maps.contains_key(&key) {
            mapgen::generate(self, key);
        }
        self.maps
            .get(&key)
            .expect("get_map: generator produced no map")
    }

    pub fn activate_map(&mut self, key: MapKey) {
        self.active_map = key;
    }

    pub fn active_map_key(&self) -> MapKey {
        self.active_map
    }

    pub fn active_map(&self) -> Option<&Map> {
        self.maps.get(&self.active_map)
    }

    /// Spawn a generic turn-taking creature and give it its first
    /// turn ticket.
    pub fn new_actor(
        &mut self,
        map: MapKey,
        pos: impl Into<IVec2>,
    ) -> Entity {
        let e = Entity(self.ecs.spawn((
            Position(pos.into()),
            OnMap(map),
            IsActor(true),
            Glyph::default(),
            Health::new(10),
            Attack(4),
        )));
        let ticket = self.sched.schedule(0, e);
        e.set(self, LiveTicket(Some(ticket)));
        e
    }

    pub fn spawn_player(
        &mut self,
        map: MapKey,
        pos: impl Into<IVec2>,
    ) -> Entity {
        let e = self.new_actor(map, pos);
        e.set(self, IsPlayer(true));
        e.set(self, Name("player".to_string()));
        e.set(
            self,
            Glyph {
                ch: '@',
                fg: Rgb(255, 255, 255),
            },
        );
        e.set(self, Health::new(30));
        e.set(self, Attack(5));
        self.player = Some(e);
        self.activate_map(map);
        self.refresh_fov(e, true);
        e
    }

    /// The live actor standing on a cell, if any. Corpses and scenery
    /// don't count.
    pub fn actor_at(
        &self,
        key: MapKey,
        pos: Position,
    ) -> Option<Entity> {
        for (h, (&p, &OnMap(m), &IsActor(live))) in self
            .ecs
            .query::<(&Position, &OnMap, &IsActor)>()
            .iter()
        {
            if live && m == key && p == pos {
                return Some(Entity(h));
            }
        }
        None
    }

    /// Where the stairway under an entity leads, if there is one going
    /// the given way.
    pub fn stair_destination(
        &self,
        e: Entity,
        dir: StairDir,
    ) -> Option<MapKey> {
        let pos = e.pos(self)?;
        let key = e.on_map(self);
        for (_, (&p, &OnMap(m), stairs)) in self
            .ecs
            .query::<(&Position, &OnMap, &Stairway)>()
            .iter()
        {
            if m == key && p == pos {
                let dest = match dir {
                    StairDir::Up => stairs.up,
                    StairDir::Down => stairs.down,
                };
                if dest.is_some() {
                    return dest;
                }
            }
        }
        None
    }

    /// Move an entity through a stairway onto another map, landing on
    /// the return stairway there.
    pub(crate) fn travel(
        &mut self,
        e: Entity,
        dest: MapKey,
        dir: StairDir,
    ) {
        let source = e.on_map(self);
        self.get_map(dest);

        let back = dir.invert();
        let mut landing = None;
        for (_, (&pos, &OnMap(m), stairs)) in self
            .ecs
            .query::<(&Position, &OnMap, &Stairway)>()
            .iter()
        {
            if m != dest {
                continue;
            }
            let links_back = match back {
                StairDir::Up => stairs.up == Some(source),
                StairDir::Down => stairs.down == Some(source),
            };
            if links_back {
                landing = Some(pos);
                break;
            }
        }
        // Map generators are required to emit a return stairway on
        // every reachable level.
        let landing = landing
            .expect("travel: destination has no return stairway");

        e.place(self, landing);
        e.set_map(self, dest);
        e.set(self, ActiveFov::default());

        if e.is_player(self) {
            self.activate_map(dest);
            self.msg.append(match dir {
                StairDir::Down => "You descend.",
                StairDir::Up => "You ascend.",
            });
            self.refresh_fov(e, true);
        }
    }

    /// Throw away a level: its map data, everything on it, and every
    /// actor's memories of it.
    pub fn destroy_map(&mut self, key: MapKey) {
        let doomed: Vec<hecs::Entity> = self
            .ecs
            .query::<&OnMap>()
            .iter()
            .filter(|&(_, &OnMap(m))| m == key)
            .map(|(h, _)| h)
            .collect();
        for h in doomed {
            let _ = self.ecs.despawn(h);
        }
        for (_, mem) in self.ecs.query_mut::<&mut Memory>() {
            mem.layers.remove(&key);
        }
        self.maps.remove(&key);
    }

    /// Entities with a visual presence on a map. Live actors sort
    /// last so they draw on top of scenery and corpses.
    pub fn drawables_on(
        &self,
        key: MapKey,
    ) -> Vec<(Position, Glyph)> {
        let mut ret: Vec<(Position, Glyph, bool)> = Vec::new();
        for (h, (&p, &OnMap(m), &g)) in self
            .ecs
            .query::<(&Position, &OnMap, &Glyph)>()
            .iter()
        {
            if m == key {
                ret.push((p, g, Entity(h).is_actor(self)));
            }
        }
        ret.sort_by_key(|&(_, _, actor)| actor);
        ret.into_iter().map(|(p, g, _)| (p, g)).collect()
    }

    pub fn scenario_status(&self) -> ScenarioStatus {
        match self.player {
            Some(p) if p.is_alive(self) => ScenarioStatus::Ongoing,
            _ => ScenarioStatus::Lost,
        }
    }

    /// Run one actor's turn.
    ///
    /// On success the actor's head ticket is consumed and a new one is
    /// issued after the action's time cost. A failed player action
    /// keeps the player's turn so the failure reason can be shown and
    /// another command tried. A failed NPC action consumes the turn
    /// with a short retry delay so a stuck NPC cannot wedge the clock.
    pub fn do_action(&mut self, actor: Entity, action: Action) {
        match action.perform(self, actor) {
            ActionResult::Success(success) => {
                let popped = self
                    .sched
                    .pop()
                    .expect("do_action: empty turn queue");
                let live = actor.get::<LiveTicket>(self);
                assert!(
                    live.0.as_ref() == Some(&popped),
                    "do_action: acting entity did not hold the head \
                     ticket"
                );
                let ticket =
                    self.sched.schedule(success.time_passed, actor);
                actor.set(self, LiveTicket(Some(ticket)));
            }
            ActionResult::Impossible(reason) => {
                if actor.is_player(self) {
                    self.msg.append(reason);
                } else {
                    log::debug!(
                        "{}: {}",
                        actor.noun(self),
                        reason
                    );
                    self.sched.pop();
                    let ticket =
                        self.sched.schedule(RETRY_DELAY, actor);
                    actor.set(self, LiveTicket(Some(ticket)));
                }
            }
        }
    }

    /// Advance the simulation until it is the player's turn or the
    /// scenario has ended. Stale tickets for dead or rescheduled
    /// entities are dropped along the way.
    pub fn until_player_turn(&mut self) -> ScenarioStatus {
        loop {
            if self.scenario_status() == ScenarioStatus::Lost {
                return ScenarioStatus::Lost;
            }
            let Some(ticket) = self.sched.peek().cloned() else {
                return ScenarioStatus::Lost;
            };
            let actor = ticket.value;

            let live = actor.get::<LiveTicket>(self);
            if live.0.as_ref() != Some(&ticket) {
                self.sched.pop();
                continue;
            }

            match actor.brain(self).action() {
                // An inert scheduled entity is the player waiting for
                // input.
                None => return ScenarioStatus::Ongoing,
                Some(action) => self.do_action(actor, action),
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn queue_len(&self) -> usize {
        self.sched.len()
    }
}
