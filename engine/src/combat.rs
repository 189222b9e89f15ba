//! Damage and death.

use crate::{ecs::*, prelude::*, tile::Rgb};

impl Entity {
    /// Take a hit from an attacker.
    pub(crate) fn damage(
        &self,
        r: &mut Runtime,
        attacker: Entity,
        amount: i32,
    ) {
        let msg = if self.is_player(r) {
            format!("The {} hits you.", attacker.noun(r))
        } else if attacker.is_player(r) {
            format!("You hit the {}.", self.noun(r))
        } else {
            format!(
                "The {} hits the {}.",
                attacker.noun(r),
                self.noun(r)
            )
        };
        r.msg.append(msg);

        let mut health = self.health(r);
        health.hp -= amount;
        self.set(r, health);

        if health.hp < 0 {
            self.die(r);
        }
    }

    /// Stop taking turns and become a corpse.
    pub(crate) fn die(&self, r: &mut Runtime) {
        if self.is_player(r) {
            r.msg.append("You die.");
        } else {
            r.msg.append(format!("The {} dies.", self.noun(r)));
        }
        log::info!("{} died", self.noun(r));

        // Any ticket still queued for this entity is now stale and
        // will be skipped by the turn loop.
        self.set(r, LiveTicket(None));
        self.set(r, IsActor(false));
        self.set(r, Brain::Inert);
        self.set(
            r,
            Glyph {
                ch: '%',
                fg: Rgb(127, 16, 16),
            },
        );
    }
}
