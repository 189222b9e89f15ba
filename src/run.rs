use engine::prelude::*;
use rand::Rng;

/// Drive the simulation with a scripted explorer player: dive down any
/// stairs it lands on, otherwise drift in random directions.
pub fn simulate(r: &mut Runtime, turns: usize) -> ScenarioStatus {
    for _ in 0..turns {
        if r.until_player_turn() == ScenarioStatus::Lost {
            return ScenarioStatus::Lost;
        }
        let Some(player) = r.player() else {
            return ScenarioStatus::Lost;
        };

        let action = match player.stairway_here(r) {
            Some(StairDir::Down) => {
                Action::UseStairs(StairDir::Down)
            }
            _ => {
                let dir = ivec2(
                    r.rng.gen_range(-1..=1),
                    r.rng.gen_range(-1..=1),
                );
                if dir == IVec2::ZERO {
                    Action::Wait
                } else {
                    Action::Bump(dir)
                }
            }
        };
        r.do_action(player, action);
    }
    r.scenario_status()
}
