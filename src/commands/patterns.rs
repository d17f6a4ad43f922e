use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::patterns::{format_matrix, run_demo};

pub fn main_with_opts(size: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let run = run_demo(size, &mut rng)?;
    println!("New Pattern Matrix:\n{}", format_matrix(&run.product));
    println!("Relationship:\n{}", format_matrix(&run.relationship));
    println!("Difference Matrix:\n{}", format_matrix(&run.difference));
    println!("Incremented Pattern Matrix:\n{}", format_matrix(&run.incremented));
    println!("Vortex:\n{}", run.vortex);
    println!("Simulated System:\n{}", run.simulated);
    Ok(())
}
