use serde::{Deserialize, Serialize};
use util::HashMap;

/// Compact handle into the tile registry. Id 0 is the void tile.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
pub struct TileId(pub(crate) u16);

impl TileId {
    pub const VOID: TileId = TileId(0);

    pub fn is_void(self) -> bool {
        self.0 == 0
    }
}

#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Default for Rgb {
    fn default() -> Self {
        Rgb(255, 255, 255)
    }
}

/// Static physical properties of one terrain type.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct TileData {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub transparent: bool,
    /// Zero means the tile cannot be walked on.
    pub walk_cost: i8,
}

impl Default for TileData {
    // The void tile: opaque, impassable, renders as blank.
    fn default() -> Self {
        TileData {
            ch: ' ',
            fg: Rgb::default(),
            bg: Rgb(0, 0, 0),
            transparent: false,
            walk_cost: 0,
        }
    }
}

/// Name-keyed lookup table of terrain types.
///
/// Registering under an existing name updates the entry in place, so
/// ids already stored in map grids stay valid.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TileRegistry {
    data: Vec<TileData>,
    names: Vec<String>,
    ids: HashMap<String, TileId>,
}

impl TileRegistry {
    /// Registry preloaded with the void tile and the standard terrain
    /// set used by the map generators.
    pub fn with_standard_tiles() -> Self {
        let mut ret = TileRegistry::default();
        ret.register("", TileData::default());
        ret.register(
            "floor",
            TileData {
                ch: '.',
                fg: Rgb(192, 192, 192),
                transparent: true,
                walk_cost: 1,
                ..Default::default()
            },
        );
        ret.register(
            "wall",
            TileData {
                ch: '#',
                fg: Rgb(192, 192, 192),
                transparent: false,
                walk_cost: 0,
                ..Default::default()
            },
        );
        ret
    }

    pub fn register(&mut self, name: &str, data: TileData) -> TileId {
        if let Some(&id) = self.ids.get(name) {
            self.data[id.0 as usize] = data;
            id
        } else {
            let id = TileId(self.data.len() as u16);
            self.data.push(data);
            self.names.push(name.to_string());
            self.ids.insert(name.to_string(), id);
            id
        }
    }

    pub fn id(&self, name: &str) -> Option<TileId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: TileId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn get(&self, id: TileId) -> &TileData {
        &self.data[id.0 as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reregistering_keeps_the_id() {
        let mut reg = TileRegistry::with_standard_tiles();
        let floor = reg.id("floor").unwrap();
        assert_eq!(reg.get(floor).ch, '.');

        let floor2 = reg.register(
            "floor",
            TileData {
                ch: ',',
                ..*reg.get(floor)
            },
        );
        assert_eq!(floor, floor2);
        assert_eq!(reg.get(floor).ch, ',');
    }

    #[test]
    fn void_is_id_zero_and_impassable() {
        let reg = TileRegistry::with_standard_tiles();
        assert_eq!(reg.id(""), Some(TileId::VOID));
        assert_eq!(TileId::default(), TileId::VOID);
        let void = reg.get(TileId::VOID);
        assert_eq!(void.walk_cost, 0);
        assert!(!void.transparent);
    }
}
