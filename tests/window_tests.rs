use cardinal_rs::{
    BloomCardinal, Cardinal, CardinalConfigBuilder, ExactCardinal,
    ExactMembership,
};
use std::{sync::Arc, thread, time::Duration};

// Helper function to create a window with a long horizon, so tests that do
// not care about rotation never cross a chunk boundary
fn create_steady_window() -> ExactCardinal {
    Cardinal::new(Duration::from_secs(3600))
        .expect("Failed to create test window")
}

// Helper function to create a window short enough to rotate within a test
fn create_short_window(window_ms: u64) -> ExactCardinal {
    let config = CardinalConfigBuilder::default()
        .window(Duration::from_millis(window_ms))
        .build()
        .expect("Failed to build test config");
    Cardinal::with_config(config).expect("Failed to create test window")
}

// Helper function to generate consistent test data
fn generate_test_tokens(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("test_token_{:06}", i).into_bytes())
        .collect()
}

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[test]
    fn test_zero_window_is_rejected() {
        assert!(ExactCardinal::new(Duration::ZERO).is_err());
        assert!(BloomCardinal::new(Duration::ZERO).is_err());
    }

    #[test]
    fn test_zero_buckets_are_rejected() {
        let config = CardinalConfigBuilder::default()
            .buckets(0)
            .build()
            .expect("Failed to build test config");
        assert!(ExactCardinal::with_config(config).is_err());
    }

    #[test]
    fn test_window_shorter_than_ring_is_rejected() {
        let config = CardinalConfigBuilder::default()
            .window(Duration::from_nanos(5))
            .buckets(10)
            .build()
            .expect("Failed to build test config");
        assert!(ExactCardinal::with_config(config).is_err());
    }

    #[test]
    fn test_zero_capacity_hint_is_rejected() {
        let config = CardinalConfigBuilder::default()
            .capacity_hint(Some(0))
            .build()
            .expect("Failed to build test config");
        assert!(BloomCardinal::with_config(config).is_err());
    }

    #[test]
    fn test_default_config_produces_working_window() {
        let window: BloomCardinal =
            Cardinal::new(Duration::from_secs(60))
                .expect("Failed to create window");
        assert_eq!(window.window(), Duration::from_secs(60));
        assert_eq!(window.chunk(), Duration::from_secs(6));
        assert_eq!(window.count().expect("Failed to count"), 0);
    }

    #[test]
    fn test_capacity_hint_constructor() {
        let window: BloomCardinal =
            Cardinal::with_capacity(Duration::from_secs(60), 100_000)
                .expect("Failed to create window");
        window.add(b"hello").expect("Failed to add");
        assert!(window.check(b"hello").expect("Failed to check"));
    }
}

#[cfg(test)]
mod counting_tests {
    use super::*;

    #[test]
    fn test_empty_window_behavior() {
        let window = create_steady_window();
        assert_eq!(window.count().expect("Failed to count"), 0);
        assert_eq!(window.uniques().expect("Failed to count uniques"), 0);
        assert!(!window.check(b"anything").expect("Failed to check"));
    }

    #[test]
    fn test_add_and_count() {
        let window = create_steady_window();
        for token in generate_test_tokens(100) {
            window.add(&token).expect("Failed to add");
        }
        // a second pass adds repeats only
        for token in generate_test_tokens(100) {
            window.add(&token).expect("Failed to add");
        }

        assert_eq!(window.count().expect("Failed to count"), 200);
        assert_eq!(window.uniques().expect("Failed to count uniques"), 100);
    }

    #[test]
    fn test_check_reports_window_membership() {
        let window = create_steady_window();
        window.add(b"present").expect("Failed to add");

        assert!(window.check(b"present").expect("Failed to check"));
        assert!(!window.check(b"absent").expect("Failed to check"));
    }

    #[test]
    fn test_empty_token_is_countable() {
        let window = create_steady_window();
        window.add(b"").expect("Failed to add");
        window.add(b"").expect("Failed to add");

        assert!(window.check(b"").expect("Failed to check"));
        assert_eq!(window.count().expect("Failed to count"), 2);
        assert_eq!(window.uniques().expect("Failed to count uniques"), 1);
    }

    #[test]
    fn test_binary_tokens() {
        let window = create_steady_window();
        let blob = vec![0u8, 255, 0, 128, 7];
        window.add(&blob).expect("Failed to add");

        assert!(window.check(&blob).expect("Failed to check"));
        assert!(!window.check(&blob[..3]).expect("Failed to check"));
    }

    #[test]
    fn test_bloom_backend_counts() {
        let window: BloomCardinal =
            Cardinal::new(Duration::from_secs(3600))
                .expect("Failed to create window");
        for token in generate_test_tokens(500) {
            window.add(&token).expect("Failed to add");
        }

        assert_eq!(window.count().expect("Failed to count"), 500);
        // false positives may only ever lower the unique count
        let uniques = window.uniques().expect("Failed to count uniques");
        assert!(uniques <= 500);
        assert!(uniques >= 450, "uniques {} lost too much", uniques);
    }
}

#[cfg(test)]
mod cardinality_tests {
    use super::*;

    #[test]
    fn test_empty_window_is_nan() {
        let window = create_steady_window();
        assert!(window.cardinality().expect("Failed to compute").is_nan());
    }

    #[test]
    fn test_all_distinct_is_one() {
        let window = create_steady_window();
        for token in generate_test_tokens(50) {
            window.add(&token).expect("Failed to add");
            // holds after every add, not only once the stream ends
            let ratio = window.cardinality().expect("Failed to compute");
            assert_eq!(ratio, 1.0);
        }
    }

    #[test]
    fn test_half_repeats_is_half() {
        let window = create_steady_window();
        for token in generate_test_tokens(50) {
            window.add(&token).expect("Failed to add");
        }
        for token in generate_test_tokens(50) {
            window.add(&token).expect("Failed to add");
        }
        let ratio = window.cardinality().expect("Failed to compute");
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn test_stats_snapshot_is_consistent() {
        let window = create_steady_window();
        for token in generate_test_tokens(40) {
            window.add(&token).expect("Failed to add");
        }
        for token in generate_test_tokens(10) {
            window.add(&token).expect("Failed to add");
        }

        let stats = window.stats().expect("Failed to take stats");
        assert_eq!(stats.count, 50);
        assert_eq!(stats.uniques, 40);
        assert_eq!(stats.cardinality, 0.8);
        assert_eq!(stats.tracked, 40);
        assert_eq!(stats.buckets, 10);
    }
}

#[cfg(test)]
mod reset_tests {
    use super::*;

    #[test]
    fn test_reset_clears_counters_and_tokens() {
        let window = create_steady_window();
        for token in generate_test_tokens(20) {
            window.add(&token).expect("Failed to add");
        }
        window.reset().expect("Failed to reset");

        assert_eq!(window.count().expect("Failed to count"), 0);
        assert_eq!(window.uniques().expect("Failed to count uniques"), 0);
        assert!(!window.check(b"test_token_000000").expect("Failed to check"));
        assert!(window.cardinality().expect("Failed to compute").is_nan());
    }

    #[test]
    fn test_window_is_usable_after_reset() {
        let window = create_steady_window();
        window.add(b"before").expect("Failed to add");
        window.reset().expect("Failed to reset");
        window.add(b"after").expect("Failed to add");

        assert!(window.check(b"after").expect("Failed to check"));
        assert!(!window.check(b"before").expect("Failed to check"));
        assert_eq!(window.count().expect("Failed to count"), 1);
    }
}

#[cfg(test)]
mod rotation_tests {
    use super::*;

    #[test]
    fn test_tokens_survive_within_the_window() {
        // 10s window, 1s chunks: a few millis of work stays in one chunk
        let window = create_short_window(10_000);
        window.add(b"alpha").expect("Failed to add");
        thread::sleep(Duration::from_millis(20));
        window.add(b"beta").expect("Failed to add");

        assert!(window.check(b"alpha").expect("Failed to check"));
        assert!(window.check(b"beta").expect("Failed to check"));
        assert_eq!(window.uniques().expect("Failed to count uniques"), 2);
    }

    #[test]
    fn test_repeat_across_chunks_is_not_unique() {
        // 500ms window, 50ms chunks
        let window = create_short_window(500);
        window.add(b"alpha").expect("Failed to add");
        thread::sleep(Duration::from_millis(60));
        window.add(b"alpha").expect("Failed to add");

        assert_eq!(window.count().expect("Failed to count"), 2);
        assert_eq!(window.uniques().expect("Failed to count uniques"), 1);
    }

    #[test]
    fn test_tokens_expire_after_a_full_ring_pass() {
        let window = create_short_window(500);
        window.add(b"alpha").expect("Failed to add");

        // every sleep crosses at least one 50ms boundary, and each add
        // rotates at most one bucket, so 12 rounds recycle the whole ring
        for filler in generate_test_tokens(12) {
            thread::sleep(Duration::from_millis(60));
            window.add(&filler).expect("Failed to add");
        }

        assert!(!window.check(b"alpha").expect("Failed to check"));
        assert!(
            window
                .check(b"test_token_000011")
                .expect("Failed to check")
        );
    }

    #[test]
    fn test_idle_gap_rotates_one_bucket_per_add() {
        let window = create_short_window(500);
        window.add(b"alpha").expect("Failed to add");

        // three chunks of idle time, then a single add: the ring moves by
        // exactly one slot and the old contents stay live
        thread::sleep(Duration::from_millis(170));
        window.add(b"beta").expect("Failed to add");

        let stats = window.stats().expect("Failed to take stats");
        assert!(stats.rotations <= 2, "rotations {}", stats.rotations);
        assert!(window.check(b"alpha").expect("Failed to check"));
    }
}

#[cfg(test)]
mod thread_safety_tests {
    use super::*;

    #[test]
    fn test_concurrent_writers_land_every_add() {
        let window: Arc<ExactCardinal> = Arc::new(
            Cardinal::new(Duration::from_secs(3600))
                .expect("Failed to create test window"),
        );

        let mut handles = Vec::new();
        for writer in 0..4u32 {
            let window = Arc::clone(&window);
            handles.push(thread::spawn(move || {
                for i in 0..250u32 {
                    let token = format!("writer_{}_{:04}", writer, i);
                    window.add(token.as_bytes()).expect("Failed to add");
                }
            }));
        }
        for handle in handles {
            handle.join().expect("Writer thread panicked");
        }

        assert_eq!(window.count().expect("Failed to count"), 1000);
        assert_eq!(window.uniques().expect("Failed to count uniques"), 1000);
    }

    #[test]
    fn test_readers_alongside_a_writer() {
        let window: Arc<Cardinal<ExactMembership>> = Arc::new(
            Cardinal::new(Duration::from_secs(3600))
                .expect("Failed to create test window"),
        );

        let writer = {
            let window = Arc::clone(&window);
            thread::spawn(move || {
                for token in generate_test_tokens(500) {
                    window.add(&token).expect("Failed to add");
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..3 {
            let window = Arc::clone(&window);
            readers.push(thread::spawn(move || {
                for token in generate_test_tokens(100) {
                    let _ = window.check(&token).expect("Failed to check");
                    let _ = window.count().expect("Failed to count");
                }
            }));
        }

        writer.join().expect("Writer thread panicked");
        for reader in readers {
            reader.join().expect("Reader thread panicked");
        }

        assert_eq!(window.count().expect("Failed to count"), 500);
        assert_eq!(window.uniques().expect("Failed to count uniques"), 500);
    }
}
