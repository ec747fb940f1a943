//! Grade command: accuracy and grade from hit counts.

use anyhow::Result;
use hitscore::{Grade, HitCounts, HitResult, accuracy};

pub fn counts(n300: u32, n100: u32, n50: u32, miss: u32) -> HitCounts {
    let mut counts = HitCounts::default();
    for (result, n) in [
        (HitResult::ThreeHundred, n300),
        (HitResult::Hundred, n100),
        (HitResult::Fifty, n50),
        (HitResult::Miss, miss),
    ] {
        for _ in 0..n {
            counts.record(result);
        }
    }
    counts
}

pub fn run(n300: u32, n100: u32, n50: u32, miss: u32, silver: bool) -> Result<()> {
    let counts = counts(n300, n100, n50, miss);
    let grade = Grade::from_counts(&counts, silver);

    println!("Objects:  {}", counts.judged_objects());
    println!("Accuracy: {:.2}%", accuracy(&counts));
    println!("Grade:    {}", grade);
    Ok(())
}
