use fastrand::Rng;
use std::{env, fs::File, io::Write, path::Path};

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/build.rs");

    let out_dir = env::var_os("OUT_DIR").expect("cargo always sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("zobrist.rs");
    let mut f = File::create(dest_path)?;

    let rng = Rng::new();
    rng.seed(16358476);

    let mut pieces = [[0u64; 64]; 12];
    for piece in pieces.iter_mut() {
        for key in piece.iter_mut() {
            *key = rng.u64(..);
        }
    }

    let side = rng.u64(..);

    let mut castle = [0u64; 16];
    for key in castle.iter_mut() {
        *key = rng.u64(..);
    }
    // No rights hash to zero, so an empty board with White to move hashes to zero
    castle[0] = 0;

    let mut ep = [0u64; 8];
    for key in ep.iter_mut() {
        *key = rng.u64(..);
    }

    writeln!(f, "const PIECES: [[u64; 64]; 12] = {:?};", pieces)?;
    writeln!(f, "const SIDE: u64 = {:?};", side)?;
    writeln!(f, "const CASTLE: [u64; 16] = {:?};", castle)?;
    writeln!(f, "const EP: [u64; 8] = {:?};", ep)
}
