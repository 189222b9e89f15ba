//! Things actors can do, in a two-phase plan/execute protocol.
//!
//! `plan` is read-only and may substitute a different action or report
//! failure with a reason. `execute` mutates the world and trusts that
//! planning already vetted the action. Callers go through `perform`,
//! which loops planning to a fixpoint before executing.

use glam::IVec2;
use util::{chebyshev_len, srng};

use crate::{ecs::*, prelude::*, TURN_COST};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StairDir {
    Up,
    Down,
}

impl StairDir {
    pub fn invert(self) -> Self {
        match self {
            StairDir::Up => StairDir::Down,
            StairDir::Down => StairDir::Up,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Action {
    Wait,
    /// Step to an adjacent cell.
    Move(IVec2),
    /// Context-dependent step: resolves to melee when an actor is in
    /// the way, to a move otherwise.
    Bump(IVec2),
    Melee(Entity),
    UseStairs(StairDir),
    /// Drift one step in a direction drawn from the turn noise.
    RandomWalk,
    /// Advance on the closest visible player.
    SeekPlayer,
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Success {
    /// Time units until the actor's next turn.
    pub time_passed: i64,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PlanResult {
    Act(Action),
    Impossible(String),
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ActionResult {
    Success(Success),
    Impossible(String),
}

impl Action {
    /// Validate the action against the current world state without
    /// changing anything. May return a different action that the
    /// original resolves into.
    pub fn plan(self, r: &Runtime, actor: Entity) -> PlanResult {
        use PlanResult::{Act, Impossible};

        let Some(pos) = actor.pos(r) else {
            return Impossible("You are nowhere.".into());
        };
        let map_key = actor.on_map(r);

        match self {
            Action::Wait => Act(self),
            Action::Move(dir) => {
                let dest = pos + dir;
                let Some(map) = r.map(map_key) else {
                    return Impossible("Blocked.".into());
                };
                let Some(&tile) = map.tiles().get(dest.0) else {
                    return Impossible("Blocked.".into());
                };
                if r.tiles.get(tile).walk_cost == 0 {
                    return Impossible("Blocked.".into());
                }
                if let Some(other) = r.actor_at(map_key, dest) {
                    if other != actor {
                        return Impossible("Blocked.".into());
                    }
                }
                Act(self)
            }
            Action::Bump(dir) => {
                let dest = pos + dir;
                match r.actor_at(map_key, dest) {
                    Some(other) if other != actor => {
                        Act(Action::Melee(other))
                    }
                    _ => Act(Action::Move(dir)),
                }
            }
            Action::Melee(target) => {
                if !target.is_actor(r) {
                    return Impossible("Nothing to attack.".into());
                }
                let Some(target_pos) = target.pos(r) else {
                    return Impossible("Nothing to attack.".into());
                };
                if target.on_map(r) != map_key
                    || chebyshev_len(target_pos.0 - pos.0) > 1
                {
                    return Impossible("Out of reach.".into());
                }
                Act(self)
            }
            Action::UseStairs(dir) => {
                if r.stair_destination(actor, dir).is_some() {
                    Act(self)
                } else {
                    Impossible("No stairs in that direction.".into())
                }
            }
            Action::RandomWalk => {
                // Deterministic per (turn, actor) so replanning the
                // same turn resolves to the same direction.
                use rand::Rng;
                let mut rng = srng(&(r.now(), actor));
                let dir = glam::ivec2(
                    rng.gen_range(-1..=1),
                    rng.gen_range(-1..=1),
                );
                if dir == IVec2::ZERO {
                    Act(Action::Wait)
                } else {
                    Act(Action::Bump(dir))
                }
            }
            Action::SeekPlayer => {
                match r.nearest_visible_player(actor) {
                    Some(target) => {
                        let t_pos = target
                            .pos(r)
                            .unwrap_or_default();
                        let dir = (t_pos.0 - pos.0)
                            .signum();
                        Act(Action::Bump(dir))
                    }
                    None => Impossible("No target.".into()),
                }
            }
        }
    }

    /// Apply a planned action to the world.
    ///
    /// Must only be called with an action `plan` has passed through
    /// unchanged. Derived actions cannot be executed directly.
    fn execute(self, r: &mut Runtime, actor: Entity) -> ActionResult {
        match self {
            Action::Wait => done(),
            Action::Move(dir) => {
                let pos = actor
                    .pos(r)
                    .unwrap_or_default();
                actor.place(r, pos + dir);
                if actor.is_player(r) {
                    r.refresh_fov(actor, true);
                }
                done()
            }
            Action::Melee(target) => {
                let amount = actor.attack_strength(r);
                target.damage(r, actor, amount);
                done()
            }
            Action::UseStairs(dir) => {
                let dest_key = r
                    .stair_destination(actor, dir)
                    .expect("UseStairs: planned without a stairway");
                r.travel(actor, dest_key, dir);
                done()
            }
            Action::Bump(_)
            | Action::RandomWalk
            | Action::SeekPlayer => {
                panic!("Action::execute: unresolved action {self:?}")
            }
        }
    }

    /// Plan to a fixpoint, then execute.
    pub fn perform(
        self,
        r: &mut Runtime,
        actor: Entity,
    ) -> ActionResult {
        let mut act = self;
        loop {
            match act.plan(r, actor) {
                PlanResult::Act(next) if next == act => break,
                PlanResult::Act(next) => act = next,
                PlanResult::Impossible(msg) => {
                    return ActionResult::Impossible(msg)
                }
            }
        }
        act.execute(r, actor)
    }
}

fn done() -> ActionResult {
    ActionResult::Success(Success {
        time_passed: TURN_COST,
    })
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;
    use crate::Map;

    /// Runtime with one 10x10 map, floor inside a wall border.
    fn arena() -> Runtime {
        let mut r = Runtime::default();
        let mut map = Map::new(10, 10);
        let floor = r.tiles.id("floor").unwrap();
        let wall = r.tiles.id("wall").unwrap();
        for (p, t) in map.tiles_mut().iter_mut() {
            let edge =
                p.x == 0 || p.y == 0 || p.x == 9 || p.y == 9;
            *t = if edge { wall } else { floor };
        }
        r.insert_map(MapKey::Hub, map);
        r.activate_map(MapKey::Hub);
        r
    }

    #[test]
    fn move_into_wall_is_blocked() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        assert_eq!(
            Action::Move(ivec2(-1, 0)).perform(&mut r, e),
            ActionResult::Impossible("Blocked.".into())
        );
        assert_eq!(e.pos(&r), Some(Position(ivec2(1, 1))));
    }

    #[test]
    fn move_onto_floor_succeeds() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        assert_eq!(
            Action::Move(ivec2(1, 0)).perform(&mut r, e),
            ActionResult::Success(Success { time_passed: 100 })
        );
        assert_eq!(e.pos(&r), Some(Position(ivec2(2, 1))));
    }

    #[test]
    fn move_into_actor_is_blocked() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        r.new_actor(MapKey::Hub, ivec2(2, 1));
        assert_eq!(
            Action::Move(ivec2(1, 0)).perform(&mut r, e),
            ActionResult::Impossible("Blocked.".into())
        );
    }

    #[test]
    fn bump_resolves_to_melee_or_move() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        let other = r.new_actor(MapKey::Hub, ivec2(2, 1));

        assert_eq!(
            Action::Bump(ivec2(1, 0)).plan(&r, e),
            PlanResult::Act(Action::Melee(other))
        );
        assert_eq!(
            Action::Bump(ivec2(0, 1)).plan(&r, e),
            PlanResult::Act(Action::Move(ivec2(0, 1)))
        );
    }

    #[test]
    fn plan_is_read_only_and_repeatable() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        r.new_actor(MapKey::Hub, ivec2(2, 1));

        let first = Action::Bump(ivec2(1, 0)).plan(&r, e);
        let second = Action::Bump(ivec2(1, 0)).plan(&r, e);
        assert_eq!(first, second);
        assert_eq!(e.pos(&r), Some(Position(ivec2(1, 1))));
    }

    #[test]
    fn melee_out_of_reach_is_rejected() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        let far = r.new_actor(MapKey::Hub, ivec2(5, 5));
        assert_eq!(
            Action::Melee(far).perform(&mut r, e),
            ActionResult::Impossible("Out of reach.".into())
        );
    }

    #[test]
    fn melee_kills_after_enough_hits() {
        let mut r = arena();
        // Default actors have 10 hp and 4 attack, death is at hp < 0,
        // so hp runs 6, 2, -2 and the third hit kills.
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        let victim = r.new_actor(MapKey::Hub, ivec2(2, 1));

        for expected_hp in [6, 2, -2] {
            Action::Melee(victim).perform(&mut r, e);
            if expected_hp >= 0 {
                assert_eq!(victim.health(&r).hp, expected_hp);
                assert!(victim.is_alive(&r));
            }
        }
        assert!(!victim.is_alive(&r));
        // Corpses don't block movement.
        assert_eq!(
            Action::Move(ivec2(1, 0)).perform(&mut r, e),
            ActionResult::Success(Success { time_passed: 100 })
        );
    }

    #[test]
    fn stairs_require_a_stairway() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(1, 1));
        assert_eq!(
            Action::UseStairs(StairDir::Down).perform(&mut r, e),
            ActionResult::Impossible(
                "No stairs in that direction.".into()
            )
        );
    }

    #[test]
    fn random_walk_is_deterministic_per_turn() {
        let mut r = arena();
        let e = r.new_actor(MapKey::Hub, ivec2(5, 5));
        let a = Action::RandomWalk.plan(&r, e);
        let b = Action::RandomWalk.plan(&r, e);
        assert_eq!(a, b);
    }
}
