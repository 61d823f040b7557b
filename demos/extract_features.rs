//! Extract features from a synthetic one-minute trajectory and print them

use gaitflux::synthetic::{ImpairmentLabel, SyntheticTrajectory};
use gaitflux::{FeatureProcessor, PipelineConfig};

fn main() {
    env_logger::init();

    let readings = SyntheticTrajectory::new(1, 60, ImpairmentLabel::Sober).generate();
    let config = PipelineConfig::default().with_window_size(10.0);

    let processor = match FeatureProcessor::with_config(config) {
        Ok(processor) => processor,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    match processor.process_to_json(&readings) {
        Ok(json) => print!("{json}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
