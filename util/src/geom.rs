use glam::IVec2;

/// Chessboard distance from origin, the move metric of 8-way grids.
pub fn chebyshev_len(v: IVec2) -> i32 {
    v.x.abs().max(v.y.abs())
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;

    #[test]
    fn chebyshev() {
        assert_eq!(chebyshev_len(ivec2(0, 0)), 0);
        assert_eq!(chebyshev_len(ivec2(1, -1)), 1);
        assert_eq!(chebyshev_len(ivec2(-3, 2)), 3);
    }
}
