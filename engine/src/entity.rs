//! Generic entity logic.

use derive_more::Deref;
use hecs::Component;

use crate::{ecs::*, prelude::*};

// Dummy wrapper so we can write impls for it directly instead of deriving a
// trait for hecs::Entity and writing every fn signature twice.
/// Game entity identifier datatype. All the actual contents live in the ECS.
#[derive(
    Copy, Clone, Hash, Eq, Ord, PartialEq, PartialOrd, Debug, Deref,
)]
pub struct Entity(pub(crate) hecs::Entity);

impl Entity {
    pub(crate) fn get<T>(&self, r: &impl AsRef<Runtime>) -> T
    where
        T: Component + Clone + Default,
    {
        let r = r.as_ref();
        r.ecs
            .get::<&T>(**self)
            .map(|c| (*c).clone())
            .unwrap_or_default()
    }

    pub(crate) fn set<T>(&self, r: &mut impl AsMut<Runtime>, val: T)
    where
        T: Component + Default + PartialEq,
    {
        let r = r.as_mut();
        if val == T::default() {
            // Remove default values, abstraction layer assumes components are
            // always present but defaulted.
            //
            // Will give an error if the component wasn't there to begin with,
            // just ignore that.
            let _ = r.ecs.remove_one::<T>(**self);
        } else {
            r.ecs.insert_one(**self, val).expect("Entity::set failed");
        }
    }

    /// Access and mutate a component using a closure.
    ///
    /// Use for complex components that aren't just atomic values.
    pub(crate) fn with_mut<T: Component + Default + Eq, U>(
        &self,
        r: &mut impl AsMut<Runtime>,
        mut f: impl FnMut(&mut T) -> U,
    ) -> U {
        let r = r.as_mut();
        let mut delete = false;
        let mut insert = false;
        let ret;

        let mut scratch = T::default();
        if let Ok(query) = r.ecs.query_one_mut::<&mut T>(**self) {
            ret = f(&mut *query);
            if *query == scratch {
                delete = true;
            }
        } else {
            ret = f(&mut scratch);
            if scratch != T::default() {
                insert = true;
            }
        }

        if delete {
            // Component became default value, remove from ECS.
            let _ = r.ecs.remove_one::<T>(**self);
        } else if insert {
            // Scratch component became a valid value.
            r.ecs
                .insert_one(**self, scratch)
                .expect("Entity::with_mut failed to set entity");
        }

        ret
    }

    /// Set the entity's position.
    ///
    /// Positions go through here instead of `set`, the origin cell is a
    /// valid position and must not be elided as a default value.
    pub(crate) fn place(
        &self,
        r: &mut impl AsMut<Runtime>,
        pos: Position,
    ) {
        let r = r.as_mut();
        r.ecs
            .insert_one(**self, pos)
            .expect("Entity::place failed");
    }

    /// Set which map the entity is on. Bypasses `set` for the same
    /// reason as `place`, the default map key is a real map.
    pub(crate) fn set_map(
        &self,
        r: &mut impl AsMut<Runtime>,
        key: MapKey,
    ) {
        let r = r.as_mut();
        r.ecs
            .insert_one(**self, OnMap(key))
            .expect("Entity::set_map failed");
    }

    pub fn pos(&self, r: &impl AsRef<Runtime>) -> Option<Position> {
        let r = r.as_ref();
        r.ecs.get::<&Position>(**self).map(|c| *c).ok()
    }

    pub fn on_map(&self, r: &impl AsRef<Runtime>) -> MapKey {
        self.get::<OnMap>(r).0
    }

    pub fn is_player(&self, r: &impl AsRef<Runtime>) -> bool {
        *self.get::<IsPlayer>(r)
    }

    /// Does the entity currently take turns?
    pub fn is_actor(&self, r: &impl AsRef<Runtime>) -> bool {
        *self.get::<IsActor>(r)
    }

    pub fn is_alive(&self, r: &impl AsRef<Runtime>) -> bool {
        self.is_actor(r)
    }

    pub fn health(&self, r: &impl AsRef<Runtime>) -> Health {
        self.get(r)
    }

    pub fn attack_strength(&self, r: &impl AsRef<Runtime>) -> i32 {
        *self.get::<Attack>(r)
    }

    pub fn glyph(&self, r: &impl AsRef<Runtime>) -> Glyph {
        self.get(r)
    }

    pub fn brain(&self, r: &impl AsRef<Runtime>) -> Brain {
        self.get(r)
    }

    pub fn active_fov(&self, r: &impl AsRef<Runtime>) -> ActiveFov {
        self.get(r)
    }

    /// The entity's recollection of a map, if it has seen any of it.
    pub fn remembers(
        &self,
        r: &impl AsRef<Runtime>,
        key: MapKey,
    ) -> Option<MemoryLayer> {
        let r = r.as_ref();
        r.ecs
            .get::<&Memory>(**self)
            .ok()
            .and_then(|m| m.layer(key).cloned())
    }

    /// Display name, "something" if the entity has no name.
    pub fn noun(&self, r: &impl AsRef<Runtime>) -> String {
        let Name(name) = self.get(r);
        if name.is_empty() {
            "something".into()
        } else {
            name
        }
    }

    /// The stairway on this entity's cell, if any.
    pub fn stairway_here(
        &self,
        r: &impl AsRef<Runtime>,
    ) -> Option<StairDir> {
        let r = r.as_ref();
        let pos = self.pos(r)?;
        let map = self.on_map(r);
        for (_, (&p, &OnMap(m), stairs)) in
            r.ecs.query::<(&Position, &OnMap, &Stairway)>().iter()
        {
            if m == map && p == pos {
                if stairs.up.is_some() {
                    return Some(StairDir::Up);
                }
                if stairs.down.is_some() {
                    return Some(StairDir::Down);
                }
            }
        }
        None
    }
}
