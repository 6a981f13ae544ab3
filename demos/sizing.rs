#![allow(clippy::uninlined_format_args)]

use cardinal_rs::{
    MembershipTester, ScalableBloom, optimal_bit_vector_size,
    optimal_num_hashes,
};

// Test configuration
const PROBES: usize = 20_000; // Number of unknown elements to test for FPR

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Bloom sizing for a single window bucket\n");
    println!(
        "{:>10} {:>8} {:>12} {:>7} {:>10} {:>12}",
        "capacity", "fpr", "bits", "hashes", "KiB", "observed"
    );

    for &capacity in &[1_000usize, 10_000, 100_000] {
        for &fpr in &[0.01f64, 0.001] {
            let bits = optimal_bit_vector_size(capacity, fpr);
            let hashes = optimal_num_hashes(capacity, bits);

            // fill to capacity, then measure the observed FPR on tokens
            // that were never inserted
            let mut filter = ScalableBloom::with_params(capacity, fpr)?;
            for i in 0..capacity {
                filter.insert(format!("element-{}", i).as_bytes())?;
            }
            let mut false_positives = 0usize;
            for i in 0..PROBES {
                if filter.contains(format!("probe-{}", i).as_bytes())? {
                    false_positives += 1;
                }
            }
            let observed = false_positives as f64 / PROBES as f64;

            println!(
                "{:>10} {:>8} {:>12} {:>7} {:>10.1} {:>12.5}",
                capacity,
                fpr,
                bits,
                hashes,
                bits as f64 / 8.0 / 1024.0,
                observed
            );
        }
    }

    Ok(())
}
