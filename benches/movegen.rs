use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use magister::{board::Board, defs::FEN_START_STRING, gen::magic::AttackTables, movegen::legal_moves, perft::perft};

const POSITIONS: &[(&str, &str)] = &[
    ("startpos", FEN_START_STRING),
    ("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
    ("position_3", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_generate(c: &mut Criterion, tables: &AttackTables) {
    let mut group = c.benchmark_group("generate");

    for &(name, fen) in POSITIONS {
        let board = Board::from_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &board, |b, board| {
            b.iter(|| legal_moves(black_box(board), tables))
        });
    }

    group.finish();
}

fn bench_make_unmake(c: &mut Criterion, tables: &AttackTables) {
    let mut group = c.benchmark_group("make_unmake");

    for &(name, fen) in POSITIONS {
        let mut board = Board::from_fen(fen).unwrap();
        let moves = legal_moves(&board, tables);
        group.throughput(Throughput::Elements(moves.size() as u64));

        group.bench_function(name, |b| {
            b.iter(|| {
                for m in moves.iter() {
                    let prior = board.make_move(black_box(m));
                    board.unmake_move(m, prior);
                }
            })
        });
    }

    group.finish();
}

fn bench_perft(c: &mut Criterion, tables: &AttackTables) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);

    for &(name, fen, depth, nodes) in &[
        ("startpos", FEN_START_STRING, 4, 197_281u64),
        ("kiwipete", POSITIONS[1].1, 3, 97_862),
    ] {
        let mut board = Board::from_fen(fen).unwrap();
        group.throughput(Throughput::Elements(nodes));
        group.bench_function(BenchmarkId::new(name, depth), |b| {
            b.iter(|| {
                let count = perft(&mut board, tables, black_box(depth));
                assert_eq!(count, nodes);
            })
        });
    }

    group.finish();
}

fn benches(c: &mut Criterion) {
    let tables = AttackTables::build().expect("magic search failed");

    bench_generate(c, &tables);
    bench_make_unmake(c, &tables);
    bench_perft(c, &tables);
}

criterion_group!(move_generation, benches);
criterion_main!(move_generation);
