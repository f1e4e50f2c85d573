//! Magic bitboard attack tables for the two sliding families.
//!
//! For every square the relevant blockers are hashed with a multiplier found
//! by random search into a dense table holding the attack set for that
//! occupancy. Tables are built once at start up and never change afterwards.

use std::fmt;
use std::time::Instant;

use fastrand::Rng;
use log::{debug, info};

use crate::{
    bitboard::BitBoard,
    defs::Square,
    error::EngineError,
    gen::ray::{ray, ray_cast, Dir},
};

/// Fixed seed, makes table construction reproducible between runs
pub const MAGIC_SEED: u64 = 0x6d61_6769_7374_6572;

/// Upper bound on candidate multipliers tried for a single square
pub const MAX_MAGIC_TRIES: usize = 100_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Rook-like, along ranks and files
    Cardinal,
    /// Bishop-like, along diagonals
    Ordinal,
}

impl Family {
    const fn dirs(self) -> [usize; 4] {
        match self {
            Family::Cardinal => [Dir::NORTH, Dir::EAST, Dir::SOUTH, Dir::WEST],
            Family::Ordinal => [Dir::NORTH_EAST, Dir::SOUTH_EAST, Dir::SOUTH_WEST, Dir::NORTH_WEST],
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Cardinal => write!(f, "cardinal"),
            Family::Ordinal => write!(f, "ordinal"),
        }
    }
}

/// Per square hashing parameters
#[derive(Clone, Copy, Debug, Default)]
pub struct MagicSquare {
    pub mask: u64,
    pub magic: u64,
    pub shift: u32,
    pub offset: usize,
}

impl MagicSquare {
    #[inline]
    const fn index(&self, occ: u64) -> usize {
        self.offset + ((occ & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

pub struct AttackTables {
    cardinal: [MagicSquare; 64],
    ordinal: [MagicSquare; 64],
    cardinal_attacks: Vec<u64>,
    ordinal_attacks: Vec<u64>,
}

impl AttackTables {
    /// Build both families with the default seed
    pub fn build() -> Result<Self, EngineError> {
        AttackTables::build_with_seed(MAGIC_SEED)
    }

    pub fn build_with_seed(seed: u64) -> Result<Self, EngineError> {
        let started = Instant::now();
        let rng = Rng::new();
        rng.seed(seed);

        let (cardinal, cardinal_attacks) = build_family(Family::Cardinal, &rng)?;
        let (ordinal, ordinal_attacks) = build_family(Family::Ordinal, &rng)?;

        info!(
            "attack tables built in {} ms ({} cardinal, {} ordinal entries)",
            started.elapsed().as_millis(),
            cardinal_attacks.len(),
            ordinal_attacks.len()
        );

        Ok(AttackTables {
            cardinal,
            ordinal,
            cardinal_attacks,
            ordinal_attacks,
        })
    }

    #[inline]
    pub fn rook_attacks(&self, sq: Square, occ: u64) -> u64 {
        let entry = &self.cardinal[sq as usize];
        self.cardinal_attacks[entry.index(occ)]
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occ: u64) -> u64 {
        let entry = &self.ordinal[sq as usize];
        self.ordinal_attacks[entry.index(occ)]
    }

    pub fn magic_square(&self, family: Family, sq: Square) -> &MagicSquare {
        match family {
            Family::Cardinal => &self.cardinal[sq as usize],
            Family::Ordinal => &self.ordinal[sq as usize],
        }
    }
}

/// Squares whose occupancy can change the attack set of a slider on `sq`,
/// the last square of each ray is left out since nothing lies behind it
pub fn blocker_mask(family: Family, sq: Square) -> u64 {
    let mut mask = BitBoard::EMPTY;

    for dir_idx in family.dirs() {
        let mut squares = ray(dir_idx, sq);
        let mut inner = squares;

        while squares != 0 {
            let target = BitBoard::pop_lsb(&mut squares);
            if ray(dir_idx, target) == 0 {
                inner &= !BitBoard::from_sq(target);
            }
        }

        mask |= inner;
    }

    mask
}

/// True attack set by casting every ray of the family until a blocker or the edge
pub fn slow_attacks(family: Family, sq: Square, occ: u64) -> u64 {
    family
        .dirs()
        .iter()
        .fold(BitBoard::EMPTY, |acc, &dir_idx| acc | ray_cast(sq, dir_idx, occ))
}

/// Every subset of `mask`, via the carry-rippler trick
fn subsets(mask: u64) -> Vec<u64> {
    let mut result = Vec::with_capacity(1 << BitBoard::count(mask));
    let mut subset = 0u64;

    loop {
        result.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    result
}

fn build_family(family: Family, rng: &Rng) -> Result<([MagicSquare; 64], Vec<u64>), EngineError> {
    let mut squares = [MagicSquare::default(); 64];
    let mut attacks = Vec::new();

    for sq in 0..64u8 {
        let mask = blocker_mask(family, sq);
        let bits = BitBoard::count(mask);
        let occupancies = subsets(mask);
        let references: Vec<u64> = occupancies
            .iter()
            .map(|&occ| slow_attacks(family, sq, occ))
            .collect();

        let (magic, table) = find_magic(mask, bits, &occupancies, &references, rng)
            .ok_or(EngineError::MagicExhausted { square: sq, family })?;

        squares[sq as usize] = MagicSquare {
            mask,
            magic,
            shift: 64 - bits,
            offset: attacks.len(),
        };
        attacks.extend_from_slice(&table);

        debug!("{family} magic for square {sq}: {magic:#018x} ({bits} bits)");
    }

    Ok((squares, attacks))
}

/// Search random sparse multipliers until one hashes every occupancy without
/// a destructive collision
fn find_magic(
    mask: u64,
    bits: u32,
    occupancies: &[u64],
    references: &[u64],
    rng: &Rng,
) -> Option<(u64, Vec<u64>)> {
    let size = 1usize << bits;
    let shift = 64 - bits;
    // Attack sets are never empty, so zero marks an unused slot
    let mut table = vec![BitBoard::EMPTY; size];

    for _ in 0..MAX_MAGIC_TRIES {
        // Sparse candidates, about one bit in eight set
        let magic = rng.u64(..) & rng.u64(..) & rng.u64(..);

        // Quick reject: the high byte of the product has to carry enough bits
        if BitBoard::count(mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000) < 6 {
            continue;
        }

        table.iter_mut().for_each(|slot| *slot = BitBoard::EMPTY);

        let collision_free = occupancies.iter().zip(references).all(|(&occ, &attack)| {
            let index = (occ.wrapping_mul(magic) >> shift) as usize;
            let slot = &mut table[index];

            if *slot == BitBoard::EMPTY {
                *slot = attack;
                true
            } else {
                *slot == attack
            }
        });

        if collision_free {
            return Some((magic, table));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defs::sq, test_support::tables, utils::square_from_string};

    #[test]
    fn blocker_masks_skip_edges() {
        assert_eq!(BitBoard::count(blocker_mask(Family::Cardinal, sq::A1)), 12);
        assert_eq!(BitBoard::count(blocker_mask(Family::Cardinal, sq::E1 - 24)), 10);
        assert_eq!(BitBoard::count(blocker_mask(Family::Ordinal, sq::A1)), 6);
        let d4 = square_from_string("d4").unwrap();
        assert_eq!(BitBoard::count(blocker_mask(Family::Ordinal, d4)), 9);

        let a1_mask = blocker_mask(Family::Cardinal, sq::A1);
        assert!(!BitBoard::contains(a1_mask, sq::A8));
        assert!(!BitBoard::contains(a1_mask, sq::H1));
    }

    #[test]
    fn subset_enumeration_is_complete() {
        let mask = blocker_mask(Family::Ordinal, sq::A1);
        let all = subsets(mask);
        assert_eq!(all.len(), 64);
        assert!(all.iter().all(|&s| s & !mask == 0));
    }

    #[test]
    fn lookups_agree_with_ray_casting() {
        let tables = tables();
        let mut rng_state = 0x1234_5678_9abc_def0u64;

        for sq in 0..64u8 {
            for _ in 0..32 {
                // xorshift, keeps the test independent of the table seed
                rng_state ^= rng_state << 13;
                rng_state ^= rng_state >> 7;
                rng_state ^= rng_state << 17;
                let occ = rng_state & (rng_state >> 3);

                assert_eq!(tables.rook_attacks(sq, occ), slow_attacks(Family::Cardinal, sq, occ));
                assert_eq!(tables.bishop_attacks(sq, occ), slow_attacks(Family::Ordinal, sq, occ));
            }
        }
    }

    #[test]
    fn default_seed_builds() {
        assert!(AttackTables::build().is_ok());
    }

    #[test]
    fn every_subset_maps_to_its_own_attack_set() {
        let tables = tables();

        for family in [Family::Cardinal, Family::Ordinal] {
            for sq in 0..64u8 {
                let entry = tables.magic_square(family, sq);
                for occ in subsets(entry.mask) {
                    let expected = slow_attacks(family, sq, occ);
                    let got = match family {
                        Family::Cardinal => tables.rook_attacks(sq, occ),
                        Family::Ordinal => tables.bishop_attacks(sq, occ),
                    };
                    assert_eq!(got, expected, "{family} square {sq}");
                }
            }
        }
    }

    #[test]
    fn construction_is_deterministic_for_a_seed() {
        let a = AttackTables::build_with_seed(7).unwrap();
        let b = AttackTables::build_with_seed(7).unwrap();
        for sq in 0..64u8 {
            assert_eq!(
                a.magic_square(Family::Cardinal, sq).magic,
                b.magic_square(Family::Cardinal, sq).magic
            );
        }
    }
}
