use std::ops::{Index, IndexMut};

use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};

/// Dense row-major 2D array addressed with cell coordinates.
///
/// The workhorse container for per-cell map data: tile layers,
/// transparency masks and visibility snapshots.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: i32, height: i32, fill: T) -> Self {
        assert!(width >= 0 && height >= 0, "Grid::new: negative dimensions");
        Grid {
            width,
            height,
            data: vec![fill; (width * height) as usize],
        }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn dim(&self) -> IVec2 {
        ivec2(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, pos: impl Into<IVec2>) -> bool {
        let pos = pos.into();
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn offset(&self, pos: IVec2) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn get(&self, pos: impl Into<IVec2>) -> Option<&T> {
        let pos = pos.into();
        self.contains(pos).then(|| &self.data[self.offset(pos)])
    }

    pub fn get_mut(&mut self, pos: impl Into<IVec2>) -> Option<&mut T> {
        let pos = pos.into();
        if self.contains(pos) {
            let idx = self.offset(pos);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }

    /// Iterate all cells with their coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &T)> {
        let w = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, c)| (ivec2(i as i32 % w, i as i32 / w), c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (IVec2, &mut T)> {
        let w = self.width;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(i, c)| (ivec2(i as i32 % w, i as i32 / w), c))
    }
}

impl<T, P: Into<IVec2>> Index<P> for Grid<T> {
    type Output = T;

    fn index(&self, pos: P) -> &T {
        let pos = pos.into();
        assert!(self.contains(pos), "Grid: index {pos} out of bounds");
        &self.data[self.offset(pos)]
    }
}

impl<T, P: Into<IVec2>> IndexMut<P> for Grid<T> {
    fn index_mut(&mut self, pos: P) -> &mut T {
        let pos = pos.into();
        assert!(self.contains(pos), "Grid: index {pos} out of bounds");
        let idx = self.offset(pos);
        &mut self.data[idx]
    }
}
