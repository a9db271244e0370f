use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use openvar::core::{InstrumentKind, OptionSide};
use openvar::instruments::{Instrument, InstrumentBook};
use openvar::pricing::black_scholes;
use openvar::risk::{monte_carlo_var_es, revalue, McParams};
use openvar::universe::Universe;

const FACTORS: usize = 50;

fn bench_universe() -> Universe {
    Universe::from_symbols((0..FACTORS).map(|i| format!("SYM{i:03}"))).expect("benchmark universe")
}

fn bench_book() -> InstrumentBook {
    let mut instruments = Vec::with_capacity(100);
    for i in 0..FACTORS as u32 {
        let price = 50.0 + i as f64;
        instruments.push(Instrument::equity(i, 10.0 + i as f64, price));

        let strike = price * 1.05;
        instruments.push(Instrument {
            id: i,
            kind: InstrumentKind::Option,
            is_call: i % 2 == 0,
            qty: if i % 3 == 0 { -5.0 } else { 5.0 },
            current_price: black_scholes::price(
                OptionSide::from_call_flag(i % 2 == 0),
                price,
                strike,
                0.02,
                0.25,
                0.5,
            )
            .max(0.01),
            underlying_price: price,
            underlying_index: i,
            strike,
            time_to_maturity: 0.5,
            implied_vol: 0.25,
            rate: 0.02,
        });
    }
    InstrumentBook::from_instruments(&instruments)
}

fn bench_revalue(c: &mut Criterion) {
    let book = bench_book();
    let shocks: Vec<f64> = (0..FACTORS)
        .map(|i| 0.01 * ((i % 7) as f64 - 3.0))
        .collect();

    c.bench_function("revalue_100_instruments_50_factors", |b| {
        b.iter(|| revalue(black_box(&book), black_box(&shocks)).expect("revaluation"))
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let universe = bench_universe();
    let book = bench_book();

    let mu = vec![1.0e-4; FACTORS];
    let mut cov = vec![0.0_f64; FACTORS * FACTORS];
    for i in 0..FACTORS {
        for j in 0..FACTORS {
            cov[i * FACTORS + j] = if i == j { 4.0e-4 } else { 5.0e-5 };
        }
    }

    let params = McParams {
        paths: 4096,
        seed: 42,
        threads: 1,
        ..McParams::default()
    };

    c.bench_function("mc_var_4096_paths_single_thread", |b| {
        b.iter(|| {
            monte_carlo_var_es(
                black_box(&book),
                black_box(&universe),
                black_box(&mu),
                black_box(&cov),
                1.0,
                0.99,
                &params,
            )
            .expect("monte carlo var")
        })
    });
}

criterion_group!(benches, bench_revalue, bench_monte_carlo);
criterion_main!(benches);
