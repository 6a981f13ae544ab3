use cardinal_rs::{BloomCardinal, Cardinal, CardinalConfigBuilder};
use rand::{Rng, seq::IndexedRandom};
use std::{thread, time::Duration};

// Constants for the demo
const WINDOW_MS: u64 = 2_000; // Short window so rotation shows up quickly
const EVENTS: usize = 5_000;
const REPORT_EVERY: usize = 500;
const COLD_POOL: u32 = 50_000; // Id space for one-off visitors

// Word list for the hot set of repeating tokens
const WORD_LIST: [&str; 12] = [
    "apple", "banana", "cherry", "date", "elderberry", "fig", "grape",
    "honeydew", "kiwi", "lemon", "mango", "nectarine",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = CardinalConfigBuilder::default()
        .window(Duration::from_millis(WINDOW_MS))
        .capacity_hint(Some(20_000))
        .build()?;
    let window: BloomCardinal = Cardinal::with_config(config)?;

    println!(
        "Streaming {} events through a {}ms window ({} buckets of {:?})\n",
        EVENTS,
        WINDOW_MS,
        cardinal_rs::DEFAULT_BUCKET_COUNT,
        window.chunk()
    );

    let mut rng = rand::rng();
    for event in 1..=EVENTS {
        // 70% of traffic comes from the small hot set, the rest are
        // visitors that mostly never come back
        let token = if rng.random_bool(0.7) {
            (*WORD_LIST.choose(&mut rng).expect("word list is empty"))
                .to_string()
        } else {
            format!("visitor-{}", rng.random_range(0..COLD_POOL))
        };
        window.add(token.as_bytes())?;

        if event % REPORT_EVERY == 0 {
            let stats = window.stats()?;
            println!(
                "after {:>5} events: count={:<6} uniques={:<6} \
                 cardinality={:.3} rotations={}",
                event,
                stats.count,
                stats.uniques,
                stats.cardinality,
                stats.rotations
            );
            // give the wall clock a chance to cross a chunk boundary
            thread::sleep(Duration::from_millis(250));
        }
    }

    let stats = window.stats()?;
    println!("\nFinal window state:");
    println!("  • count:       {}", stats.count);
    println!("  • uniques:     {}", stats.uniques);
    println!("  • cardinality: {:.3}", stats.cardinality);
    println!("  • rotations:   {}", stats.rotations);
    println!("  • tracked:     {}", stats.tracked);
    println!(
        "  • apple seen:  {}",
        window.check(b"apple")?
    );

    Ok(())
}
