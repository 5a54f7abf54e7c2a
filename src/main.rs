use pmc_td::graph::BitGraph;
use pmc_td::io::{PaceReader, PaceWriter};
use pmc_td::solver::Solver;
use pmc_td::timeout::{initialize_timeout, ProcessStopper};
use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{stdin, stdout, BufReader};
use std::path::PathBuf;
use std::time::SystemTime;
use structopt::StructOpt;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pmc-td-cli",
    about = "Computes optimal tree decompositions for a given input graph."
)]
struct Opt {
    /// Input file, using the graph format of the PACE challenge.
    /// `stdin` if not specified.
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// Output file. `stdout` if not specified.
    #[structopt(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Gives up after this many seconds.
    #[structopt(short, long)]
    timeout: Option<u64>,

    /// Known lower bound on the treewidth.
    #[structopt(short, long)]
    lowerbound: Option<usize>,
}

fn main() -> io::Result<()> {
    #[cfg(feature = "pace-logging")]
    pmc_td::log::build_pace_logger();
    #[cfg(feature = "handle-ctrlc")]
    pmc_td::signals::initialize();

    let opt = Opt::from_args();
    if let Some(timeout) = opt.timeout {
        initialize_timeout(timeout);
    }

    let graph: BitGraph = match opt.input {
        Some(path) => {
            let file = File::open(path)?;
            let reader = PaceReader(BufReader::new(file));
            BitGraph::try_from(reader)?
        }
        None => {
            let stdin = stdin();
            let reader = PaceReader(stdin.lock());
            BitGraph::try_from(reader)?
        }
    };

    let start = SystemTime::now();
    let td = Solver::default()
        .lowerbound(opt.lowerbound)
        .solve_with_stopper(&graph, ProcessStopper)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("c width = {}", td.width());
    if let Ok(elapsed) = start.elapsed() {
        println!("c time = {} ms", elapsed.as_millis());
    }

    match opt.output {
        Some(path) => {
            let writer = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            PaceWriter::new(&td, &graph, writer).output()
        }
        None => {
            let writer = stdout();
            PaceWriter::new(&td, &graph, writer).output()
        }
    }
}
