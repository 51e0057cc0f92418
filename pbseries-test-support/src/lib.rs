use std::path::PathBuf;
use std::sync::Once;

use pbseries::{nano_diff, Sample, SampleStore};
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;
use temp_dir::TempDir;

pub fn setup_tracing() {
    use tracing_subscriber::filter::{EnvFilter, LevelFilter};
    use tracing_subscriber::{fmt, prelude::*};

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();
        let fmt = fmt::layer()
            .pretty()
            .with_line_number(true)
            .with_test_writer();

        let _ignore_err = tracing_subscriber::registry()
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .with(fmt)
            .try_init();
    });
}

/// Saves `store` as `<name>.pb` inside `dir`.
pub fn write_fixture(dir: &TempDir, name: &str, store: &SampleStore) -> PathBuf {
    let path = dir.child(format!("{name}.pb"));
    pbseries::save(&path, store.header(), store.samples(), false).unwrap();
    path
}

/// Every sample lies exactly `gap_ns` after the one before it.
pub fn assert_spacing(samples: &[Sample], gap_ns: i64) {
    for (i, pair) in samples.windows(2).enumerate() {
        assert_eq!(
            nano_diff(&pair[0], &pair[1]),
            gap_ns,
            "gap between sample {i} and {} is off",
            i + 1
        );
    }
}

/// Every sample lies at least `gap_ns` after the one before it.
pub fn assert_min_spacing(samples: &[Sample], gap_ns: i64) {
    if let Some((i, diff)) = samples
        .windows(2)
        .map(|pair| nano_diff(&pair[0], &pair[1]))
        .enumerate()
        .find(|(_, diff)| *diff < gap_ns)
    {
        panic!(
            "sample {} lies only {diff} ns after sample {i}, expected at least {gap_ns} ns",
            i + 1
        );
    }
}

/// Random bytes with the bytes that need escaping over represented.
pub fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    const SPECIAL: [u8; 3] = [0x1b, 0x0a, 0x0d];

    let mut rng = Xoshiro128StarStar::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.random_bool(0.3) {
                SPECIAL[rng.random_range(0..SPECIAL.len())]
            } else {
                rng.random()
            }
        })
        .collect()
}
