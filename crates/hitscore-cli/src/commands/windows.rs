//! Windows command: print hit windows for an OD value.

use anyhow::Result;
use hitscore::{Difficulty, ModResolver, ModSet, TimingWindows, spinner_rotations_needed};

/// Windows after HardRock/Easy adjustment of `od`
pub fn resolve(od: f32, mods: Option<&str>) -> Result<(f32, TimingWindows)> {
    let mods: ModSet = mods.unwrap_or_default().parse()?;
    let resolver = ModResolver::new(mods, Default::default());
    let difficulty = Difficulty {
        overall_difficulty: od,
        ..Default::default()
    };
    let adjusted = resolver.adjusted_difficulty(difficulty).overall_difficulty;
    Ok((adjusted, TimingWindows::from_od(adjusted)))
}

pub fn run(od: f32, mods: Option<&str>) -> Result<()> {
    let (adjusted, windows) = resolve(od, mods)?;

    println!("OD {:.1} (effective {:.1})", od, adjusted);
    println!("  300:  +/-{}ms", windows.great_ms);
    println!("  100:  +/-{}ms", windows.good_ms);
    println!("  50:   +/-{}ms", windows.meh_ms);
    println!("  miss: +/-{}ms", windows.miss_ms);
    println!(
        "  spinner: {:.2} rotations per second",
        spinner_rotations_needed(1000, adjusted)
    );

    Ok(())
}
