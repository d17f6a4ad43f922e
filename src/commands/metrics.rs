use crate::core::cas::render;
use crate::core::geometry::report::label;
use crate::core::geometry::{Metric, Preset, DIM};

pub fn main(pretty: bool) -> anyhow::Result<()> {
    for preset in Preset::all() {
        let metric = Metric::preset(preset);
        println!("{:<20} {}", preset.name(), preset.description());
        for i in 0..DIM {
            let name = label("g", &[], &[i, i], metric.coords(), pretty);
            for line in render::labeled(&name, metric.get(i, i), pretty).lines() {
                println!("    {}", line);
            }
        }
    }
    Ok(())
}
