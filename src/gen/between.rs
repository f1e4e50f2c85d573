use crate::{
    bitboard::BitBoard,
    defs::Square,
    gen::ray::{ray_cast, Dir},
};

pub const BETWEEN: [[u64; 64]; 64] = gen_between();

/// Squares strictly between `source` and `dest` if they share a line, empty otherwise
pub const fn between(source: Square, dest: Square) -> u64 {
    BETWEEN[source as usize][dest as usize]
}

const fn gen_between() -> [[u64; 64]; 64] {
    let mut between = [[0; 64]; 64];
    let mut src = 0;

    while src < 64 {
        let mut dir_idx = 0;
        while dir_idx < Dir::N_DIRS {
            let mut targets = ray_cast(src as Square, dir_idx, BitBoard::EMPTY);

            while targets != 0 {
                let dest = targets.trailing_zeros() as Square;
                targets &= targets - 1;

                // The ray towards dest, stopped by dest itself, minus dest
                let path = ray_cast(src as Square, dir_idx, BitBoard::from_sq(dest));
                between[src][dest as usize] = path & !BitBoard::from_sq(dest);
            }

            dir_idx += 1;
        }
        src += 1;
    }

    between
}
