use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;
use subway_route::SubwayNetwork;
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(name = "subway")]
#[command(about = "Build a station graph from a metro network JSON document and find the shortest route between two stations.", long_about = None)]
struct Cli {
    /// Path to the network JSON document
    #[arg(short, long)]
    network: String,

    /// Origin station name
    #[arg(short, long)]
    from: String,

    /// Destination station name
    #[arg(short, long)]
    to: String,

    /// Print every equally-short route instead of one
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Upper bound on routes printed with --all
    #[arg(long, default_value_t = 16)]
    max_routes: usize,

    /// Output CSV (station, distance_m) of every station's distance from --from
    #[arg(short, long)]
    out: Option<String>,

    /// Include unreachable stations in the CSV with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn write_distances(network: &SubwayNetwork, cli: &Cli, out_path: &str) -> Result<()> {
    let mut rows = network.distances_from(&cli.from)?;
    // unreachable last
    rows.sort_by_key(|&(_, d)| d.unwrap_or(u64::MAX));

    let mut wtr =
        Writer::from_path(out_path).with_context(|| format!("creating CSV {}", out_path))?;
    wtr.write_record(["station", "distance_m"])?;
    let mut written = 0;
    for (name, d) in &rows {
        match d {
            Some(d) => wtr.write_record([*name, d.to_string().as_str()])?,
            None if cli.include_unreachable => wtr.write_record([*name, "inf"])?,
            None => continue,
        }
        written += 1;
    }
    wtr.flush()?;
    info!("Wrote distances for {} stations to {}", written, out_path);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let body = fs::read(&cli.network).with_context(|| format!("reading {}", &cli.network))?;
    let network = SubwayNetwork::from_slice(&body)
        .with_context(|| format!("loading network from {}", &cli.network))?;

    info!(
        "Network {:?}: {} station records, {} stations, {} directed edges",
        network.name,
        network.records().len(),
        network.graph().len(),
        network.graph().edge_count()
    );
    for record in network.records() {
        debug!(line = %record.line, station = %record.name, lat = record.coordinate.lat, lon = record.coordinate.lon, "record");
    }

    let now = Instant::now();
    let routes = if cli.all {
        network.routes(&cli.from, &cli.to, cli.max_routes)?
    } else {
        vec![network.route(&cli.from, &cli.to)?]
    };
    info!("{} s", now.elapsed().as_secs_f64());

    for (i, route) in routes.iter().enumerate() {
        println!("Route {} ({} m):", i, route.distance);
        for station in &route.stations {
            println!("  {}", station);
        }
    }

    if let Some(out_path) = &cli.out {
        write_distances(&network, &cli, out_path)?;
    }

    Ok(())
}
