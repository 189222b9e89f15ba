use std::any::Any;

use util::{Grid, HashMap};

use crate::TileId;

/// Typed key for a lazily allocated per-map data layer.
///
/// Declare these as consts next to the code that owns the layer. The
/// key string must be unique per type, two attributes sharing a key
/// with different types will collide.
#[derive(Copy, Clone, Debug)]
pub struct MapAttr<T: Clone> {
    pub key: &'static str,
    pub default: T,
}

impl<T: Clone> MapAttr<T> {
    pub const fn new(key: &'static str, default: T) -> Self {
        MapAttr { key, default }
    }
}

/// One level of terrain plus its auxiliary data layers.
pub struct Map {
    tiles: Grid<TileId>,
    layers: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl Map {
    pub fn new(width: i32, height: i32) -> Self {
        Map {
            tiles: Grid::new(width, height, TileId::VOID),
            layers: Default::default(),
        }
    }

    pub fn width(&self) -> i32 {
        self.tiles.width()
    }

    pub fn height(&self) -> i32 {
        self.tiles.height()
    }

    pub fn dim(&self) -> glam::IVec2 {
        self.tiles.dim()
    }

    pub fn contains(&self, pos: impl Into<glam::IVec2>) -> bool {
        self.tiles.contains(pos)
    }

    pub fn tiles(&self) -> &Grid<TileId> {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut Grid<TileId> {
        &mut self.tiles
    }

    /// Access an auxiliary layer, allocating it filled with the
    /// attribute's default on first use.
    pub fn layer<T: Clone + Send + Sync + 'static>(
        &mut self,
        attr: &MapAttr<T>,
    ) -> &mut Grid<T> {
        let (w, h) = (self.tiles.width(), self.tiles.height());
        self.layers
            .entry(attr.key)
            .or_insert_with(|| {
                Box::new(Grid::new(w, h, attr.default.clone()))
            })
            .downcast_mut::<Grid<T>>()
            .expect("Map::layer: attribute key reused with another type")
    }
}
