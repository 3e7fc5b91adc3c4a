use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use rps_arbiter::{resolve, Address, Arbiter, Move};

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_all_pairs", |b| {
        b.iter(|| {
            for m1 in Move::ALL {
                for m2 in Move::ALL {
                    black_box(resolve(black_box(m1), black_box(m2)));
                }
            }
        })
    });
}

fn bench_match_flow(c: &mut Criterion) {
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");

    c.bench_function("create_join_play_redeem_x100", |b| {
        let mut rng = StdRng::seed_from_u64(12345);
        b.iter(|| {
            let mut arbiter = Arbiter::default();
            for _ in 0..100 {
                let id = arbiter.create_game(alice);
                arbiter.join_game(id, bob).ok();
                arbiter.submit_move(id, alice, rng.gen_range(1..=3)).ok();
                arbiter.submit_move(id, bob, rng.gen_range(1..=3)).ok();

                if let Ok(game) = arbiter.get_game(id) {
                    if let Some(winner) = game.winner {
                        arbiter.redeem_victory_nft(id, "ipfs://bench", winner).ok();
                    }
                }
            }
            black_box(arbiter.take_events().len())
        })
    });
}

criterion_group!(benches, bench_resolve, bench_match_flow);
criterion_main!(benches);
