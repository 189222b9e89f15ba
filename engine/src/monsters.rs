use glam::IVec2;

use crate::{ecs::*, prelude::*, tile::Rgb};

/// Static stats for one monster species.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MonsterType {
    pub name: &'static str,
    pub ch: char,
    pub fg: Rgb,
    pub hp: i32,
    pub attack: i32,
    pub brain: Brain,
}

pub const BESTIARY: [MonsterType; 3] = [
    MonsterType {
        name: "rat",
        ch: 'r',
        fg: Rgb(127, 96, 63),
        hp: 4,
        attack: 1,
        brain: Brain::RandomWalk,
    },
    MonsterType {
        name: "orc",
        ch: 'o',
        fg: Rgb(63, 127, 63),
        hp: 10,
        attack: 2,
        brain: Brain::SeekPlayer,
    },
    MonsterType {
        name: "troll",
        ch: 'T',
        fg: Rgb(0, 127, 0),
        hp: 16,
        attack: 4,
        brain: Brain::SeekPlayer,
    },
];

pub fn monster_type(name: &str) -> Option<&'static MonsterType> {
    BESTIARY.iter().find(|t| t.name == name)
}

pub fn spawn_monster(
    r: &mut Runtime,
    kind: &MonsterType,
    map: MapKey,
    pos: impl Into<IVec2>,
) -> Entity {
    let e = r.new_actor(map, pos);
    e.set(r, Name(kind.name.to_string()));
    e.set(
        r,
        Glyph {
            ch: kind.ch,
            fg: kind.fg,
        },
    );
    e.set(r, Health::new(kind.hp));
    e.set(r, Attack(kind.attack));
    e.set(r, kind.brain);
    e
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bestiary_lookup() {
        assert_eq!(monster_type("orc").unwrap().hp, 10);
        assert_eq!(monster_type("troll").unwrap().attack, 4);
        assert_eq!(monster_type("rat").unwrap().brain, Brain::RandomWalk);
        assert_eq!(monster_type("dragon"), None);
    }
}
