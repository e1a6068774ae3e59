use std::time::Instant;

use log::{error, info};

use near_next_core::{ItineraryOptions, Result, interrupt, logging, run};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = ItineraryOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    if let Err(err) = run(&options) {
        if interrupt::is_cancelled() {
            error!("{} cancelled, nothing written", options.command);
        } else {
            error!("{} failed: {err}", options.command);
        }
        return Err(err);
    }

    info!(
        "{} done time={:.2}s",
        options.command,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
