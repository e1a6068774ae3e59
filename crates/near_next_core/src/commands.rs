use std::{
    fs,
    io::Write,
    path::Path,
    sync::atomic::AtomicBool,
    time::Instant,
};

use crate::{
    Error, Result,
    geo::{EllipsoidOracle, GeoPoint, LocationToken, SphericalOracle},
    interrupt,
    io::{
        csv,
        listing,
        options::{Command, ItineraryOptions, SearchMode},
        records,
        report::TourReport,
    },
    itinerary::{ItineraryDriver, LocationStore, OutputSequencer, SearchStats},
    tour::{Tour, TourMetrics, nautical_miles},
};

/// Outcome of one itinerary run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItinerarySummary {
    pub records: usize,
    pub stats: SearchStats,
    pub metrics: TourMetrics,
}

/// Runs `options.command`, with Ctrl-C wired to cancellation.
pub fn run(options: &ItineraryOptions) -> Result<()> {
    options.validate()?;
    match options.command {
        Command::Itinerary => {
            build_itinerary(options, Some(interrupt::cancel_flag()))?;
        }
        Command::Encode => {
            encode_csv(options)?;
        }
        Command::List => list_records(options)?,
        Command::Report => report_tour(options)?,
    }
    Ok(())
}

/// Reads the input records, orders them into an itinerary and writes the
/// result. Nothing is written unless every step succeeds.
pub fn build_itinerary(
    options: &ItineraryOptions,
    cancel: Option<&AtomicBool>,
) -> Result<ItinerarySummary> {
    options.validate()?;
    let input = required(options.input_path(), "input")?;
    let output = required(options.output_path(), "output")?;

    let mut store: LocationStore<GeoPoint> = records::read_store(input)?;
    let n = store.len();
    log::info!("itinerary: records={n} input={}", input.display());

    let oracle = SphericalOracle;
    let driver = match options.search_mode {
        SearchMode::Window => {
            let size = options.window_size()?;
            log::debug!(
                "itinerary: window={} half_width={}",
                size.get(),
                size.half_width()
            );
            ItineraryDriver::new(&oracle, size)
        }
        SearchMode::BruteForce => ItineraryDriver::brute_force(&oracle),
    };
    let driver = match cancel {
        Some(cancel) => driver.with_cancel(cancel),
        None => driver,
    };
    let stats = driver.run(&mut store, options.start)?;

    let tour = Tour::new(OutputSequencer::reorder(store)?);
    let metrics = tour.metrics(&EllipsoidOracle::default());
    let total = metrics.reported_total(options.close_tour);

    log::info!(
        "itinerary: window_hits={} outward={} time={:.3}s",
        stats.window_hits(),
        stats.outward_searches,
        stats.elapsed.as_secs_f64()
    );
    log::info!(
        "itinerary: total_m={total:.1} total_nm={:.3} return_m={:.1} return_nm={:.3} closed={}",
        nautical_miles(total),
        metrics.return_leg,
        nautical_miles(metrics.return_leg),
        options.close_tour
    );

    records::write_records(output, &tour.points)?;
    log::info!("itinerary: wrote records={n} output={}", output.display());

    Ok(ItinerarySummary {
        records: n,
        stats,
        metrics,
    })
}

/// Encodes a CSV of degrees into a sorted token file; returns the token count.
pub fn encode_csv(options: &ItineraryOptions) -> Result<usize> {
    let now = Instant::now();
    let input = required(options.input_path(), "input")?;
    let output = required(options.output_path(), "output")?;

    let text = fs::read_to_string(input).map_err(|e| Error::file(input, e))?;
    let encoded = csv::encode_lines(&text)?;
    records::write_records(output, &encoded.tokens)?;

    log::info!(
        "encode: lines={} records={} duplicates={} time={:.3}s",
        encoded.lines,
        encoded.tokens.len(),
        encoded.duplicates,
        now.elapsed().as_secs_f64()
    );
    Ok(encoded.tokens.len())
}

fn list_records(options: &ItineraryOptions) -> Result<()> {
    let input = required(options.input_path(), "input")?;
    let tokens: Vec<LocationToken> = records::read_records(input)?;
    let text = listing::render_listing(&tokens, options.limit)?;
    emit(options.output_path(), &text)
}

fn report_tour(options: &ItineraryOptions) -> Result<()> {
    let input = required(options.input_path(), "input")?;
    let tour = Tour::new(records::read_records::<GeoPoint>(input)?);
    let text = TourReport::measure(&tour).render(options.close_tour)?;
    emit(options.output_path(), &text)
}

fn emit(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text).map_err(|e| Error::file(path, e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn required<'a>(path: Option<&'a Path>, name: &str) -> Result<&'a Path> {
    path.ok_or_else(|| Error::invalid_input(format!("--{name} is required")))
}
