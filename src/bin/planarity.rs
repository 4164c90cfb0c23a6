//! Command-line surface over the `planarity` crate (spec.md §6). A thin
//! `clap`-derive wrapper: every algorithmic decision happens in the
//! library, this binary only parses arguments, does file I/O, and maps the
//! library's three-valued result onto a process exit code.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;

use planarity::error::PlanarityError;
use planarity::store::{EmbedMode, GraphStore};
use planarity::{engine, generate, io, verify};

#[derive(Parser)]
#[command(
    name = "planarity",
    about = "Linear-time planar/outerplanar embedding, Kuratowski/K4/K2,3/K3,3 isolation, and visibility drawing"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (`-v`, `-vv`); defaults to warnings only.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, ValueEnum)]
enum Mode {
    /// `-p`: planar embedding.
    Planar,
    /// `-o`: outerplanar embedding.
    Outerplanar,
    /// `-d`: planar embedding plus visibility drawing.
    Draw,
    /// `-2`: K2,3 homeomorphism search.
    K23,
    /// `-3`: K3,3 homeomorphism search.
    K33,
    /// `-4`: K4 homeomorphism search.
    K4,
}

impl Mode {
    fn embed_mode(self) -> EmbedMode {
        match self {
            Mode::Planar => EmbedMode::Planar,
            Mode::Outerplanar => EmbedMode::Outerplanar,
            Mode::Draw => EmbedMode::DrawPlanar,
            Mode::K23 => EmbedMode::SearchK23,
            Mode::K33 => EmbedMode::SearchK33,
            Mode::K4 => EmbedMode::SearchK4,
        }
    }

    fn is_outerplanar_like(self) -> bool {
        matches!(self, Mode::Outerplanar | Mode::K23 | Mode::K4)
    }
}

#[derive(Subcommand)]
enum Command {
    /// `-s C I O [O2]`: run algorithm `C` on the graph read from file `I`.
    Specific {
        #[arg(value_enum)]
        mode: Mode,
        input: PathBuf,
        output: PathBuf,
        output2: Option<PathBuf>,
    },
    /// `-r C K N`: generate `K` random graphs of `N` vertices and apply `C`
    /// to each, reporting a summary rather than per-graph files.
    Random {
        #[arg(value_enum)]
        mode: Mode,
        count: u32,
        n: u32,
    },
    /// `-m N O [O2]`: generate a maximal planar random graph on `N`
    /// vertices.
    Maximal { n: u32, output: PathBuf, output2: Option<PathBuf> },
    /// `-n N O [O2]`: generate a maximal-planar-plus-one (guaranteed
    /// nonplanar) random graph on `N` vertices.
    MaximalPlusOne { n: u32, output: PathBuf, output2: Option<PathBuf> },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    std::process::exit(run(cli.command));
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Maps library results to a process exit code. Spec.md §6 says "−2 on
/// read failure or internal error"; a process cannot exit with a negative
/// code, so this crate maps it to the smallest distinguishing positive
/// code, `2`, documented here and in `--help`.
const EXIT_FAILURE: i32 = 2;

fn run(command: Command) -> i32 {
    match command {
        Command::Specific { mode, input, output, output2 } => run_specific(mode, &input, &output, output2.as_deref()),
        Command::Random { mode, count, n } => run_random(mode, count, n),
        Command::Maximal { n, output, output2 } => run_generate(n, &output, output2.as_deref(), false),
        Command::MaximalPlusOne { n, output, output2 } => run_generate(n, &output, output2.as_deref(), true),
    }
}

fn run_specific(mode: Mode, input: &PathBuf, output: &PathBuf, output2: Option<&std::path::Path>) -> i32 {
    let mut file = match File::open(input) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!(error = %e, path = %input.display(), "failed to open input file");
            return EXIT_FAILURE;
        }
    };
    let mut store = match io::read_graph_auto(&mut file) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse input graph");
            return EXIT_FAILURE;
        }
    };

    match engine::embed(&mut store, mode.embed_mode()) {
        Ok(engine::EmbedOutcome::Success) => {
            if let Err(e) = verify::check_embedding(&store, mode.is_outerplanar_like()) {
                tracing::error!(error = %e, "embedding failed integrity verification");
                return EXIT_FAILURE;
            }
            if write_primary(&store, output).is_err() {
                return EXIT_FAILURE;
            }
            if matches!(mode, Mode::Draw) {
                if let Some(path) = output2 {
                    if write_drawing_aux(&store, path).is_err() {
                        return EXIT_FAILURE;
                    }
                }
            }
            tracing::info!("embedding succeeded");
            0
        }
        Ok(engine::EmbedOutcome::NonEmbeddable(witness)) => {
            if let Err(e) = verify::check_obstruction(&store, &witness) {
                tracing::error!(error = %e, "obstruction witness failed integrity verification");
                return EXIT_FAILURE;
            }
            tracing::info!(kind = ?witness.kind, "graph is not embeddable; obstruction isolated");
            if let Some(path) = output2 {
                if write_witness(&witness, path).is_err() {
                    return EXIT_FAILURE;
                }
            }
            0
        }
        Err(PlanarityError::NonEmbeddable) => {
            tracing::info!("edge count alone exceeds the embeddable bound");
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "internal error during embedding");
            EXIT_FAILURE
        }
    }
}

fn run_random(mode: Mode, count: u32, n: u32) -> i32 {
    let mut rng = rand::rngs::StdRng::from_entropy();
    let mut successes = 0u32;
    for i in 0..count {
        let m_target = if mode.is_outerplanar_like() { 2 * n } else { 3 * n };
        let mut store = match generate::random_graph(n, m_target, &mut rng) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "failed to generate random graph {i}");
                return EXIT_FAILURE;
            }
        };
        match engine::embed(&mut store, mode.embed_mode()) {
            Ok(engine::EmbedOutcome::Success) => successes += 1,
            Ok(engine::EmbedOutcome::NonEmbeddable(_)) => {}
            Err(PlanarityError::NonEmbeddable) => {}
            Err(e) => {
                tracing::error!(error = %e, "internal error on random graph {i}");
                return EXIT_FAILURE;
            }
        }
    }
    tracing::info!(successes, count, "random graph batch complete");
    0
}

fn run_generate(n: u32, output: &PathBuf, output2: Option<&std::path::Path>, plus_one: bool) -> i32 {
    let mut rng = rand::rngs::StdRng::from_entropy();
    let result = if plus_one {
        generate::maximal_planar_plus_one(n, &mut rng)
    } else {
        generate::maximal_planar(n, &mut rng)
    };
    let store = match result {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to generate graph");
            return EXIT_FAILURE;
        }
    };
    if write_primary(&store, output).is_err() {
        return EXIT_FAILURE;
    }
    if let Some(path) = output2 {
        let mut store2 = store;
        match engine::embed(&mut store2, EmbedMode::Planar) {
            Ok(_) => {
                if write_primary(&store2, path).is_err() {
                    return EXIT_FAILURE;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to embed generated graph for secondary output");
                return EXIT_FAILURE;
            }
        }
    }
    0
}

fn write_primary(store: &GraphStore, path: &std::path::Path) -> Result<(), ()> {
    let file = File::create(path).map_err(|e| tracing::error!(error = %e, "failed to create output file"))?;
    let mut w = BufWriter::new(file);
    io::write_adjacency_list(&mut w, store).map_err(|e| tracing::error!(error = %e, "failed to write output"))
}

fn write_drawing_aux(store: &GraphStore, path: &std::path::Path) -> Result<(), ()> {
    let file = File::create(path).map_err(|e| tracing::error!(error = %e, "failed to create drawing output file"))?;
    let mut w = BufWriter::new(file);
    io::write_draw_planar_block(&mut w, store)
        .map_err(|e| tracing::error!(error = %e, "failed to write drawing block"))?;
    io::write_ascii_visibility(&mut w, store).map_err(|e| tracing::error!(error = %e, "failed to write ASCII grid"))
}

fn write_witness(witness: &planarity::Subgraph, path: &std::path::Path) -> Result<(), ()> {
    let file =
        File::create(path).map_err(|e| tracing::error!(error = %e, "failed to create witness output file"))?;
    let mut w = BufWriter::new(file);
    use std::io::Write;
    writeln!(w, "{:?}", witness.kind).map_err(|e| tracing::error!(error = %e, "failed to write witness"))?;
    for v in &witness.vertices {
        writeln!(w, "{}", v.0 + 1).map_err(|e| tracing::error!(error = %e, "failed to write witness"))?;
    }
    for &(u, v) in &witness.edges {
        writeln!(w, "{} {}", u.0 + 1, v.0 + 1).map_err(|e| tracing::error!(error = %e, "failed to write witness"))?;
    }
    Ok(())
}
