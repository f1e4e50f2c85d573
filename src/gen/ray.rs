use crate::{
    bitboard::BitBoard,
    defs::Square,
    utils::{coord_from_square, square_from_coord},
};

/// Rook directions are 0-3
///
/// Bishops directions are 4-7
pub struct Dir;

impl Dir {
    pub const NORTH: usize = 0;
    pub const EAST: usize = 1;
    pub const SOUTH: usize = 2;
    pub const WEST: usize = 3;
    pub const NORTH_EAST: usize = 4;
    pub const SOUTH_EAST: usize = 5;
    pub const SOUTH_WEST: usize = 6;
    pub const NORTH_WEST: usize = 7;

    pub const N_DIRS: usize = 8;
}

/// `(file, rank)` step per direction
pub const DIRS: [(i8, i8); Dir::N_DIRS] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

pub const RAY: [[u64; 64]; Dir::N_DIRS] = gen_rays();

/// All squares from `sq` up to the board edge in the given direction, `sq` excluded
pub const fn ray(dir_idx: usize, sq: Square) -> u64 {
    RAY[dir_idx][sq as usize]
}

/// Cast a ray from `sq` until the edge of the board or the first blocker,
/// the blocker itself included
pub const fn ray_cast(sq: Square, dir_idx: usize, occ: u64) -> u64 {
    let (mut file, mut rank) = coord_from_square(sq);
    let (df, dr) = DIRS[dir_idx];
    let mut attacks = BitBoard::EMPTY;

    loop {
        file += df;
        rank += dr;
        let target = match square_from_coord(file, rank) {
            Some(t) => t,
            None => break,
        };

        attacks |= BitBoard::from_sq(target);
        if BitBoard::contains(occ, target) {
            break;
        }
    }

    attacks
}

const fn gen_rays() -> [[u64; 64]; Dir::N_DIRS] {
    let mut rays = [[0; 64]; Dir::N_DIRS];
    let mut dir_idx = 0;

    while dir_idx < Dir::N_DIRS {
        let mut src = 0;
        while src < 64 {
            rays[dir_idx][src] = ray_cast(src as Square, dir_idx, BitBoard::EMPTY);
            src += 1;
        }
        dir_idx += 1;
    }

    rays
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::sq;

    #[test]
    fn rays_stop_at_first_blocker() {
        let occ = BitBoard::from_sq(sq::E1 - 24);
        let north = ray_cast(sq::E1, Dir::NORTH, occ);
        assert_eq!(BitBoard::count(north), 3);
        assert!(BitBoard::contains(north, sq::E1 - 24));
    }
}
