use std::{fmt, path::Path, process, str::FromStr};

use clap::Parser;
use huffman_rust::{files, utils::logger, Properties};

#[derive(Parser, Debug)]
#[command(about = "Compress and decompress files with a static byte-level Huffman code")]
struct Args {
    /// One of build_tree, compress or decompress
    mode: String,
    /// Source filename
    input_file: String,
    /// Destination filename
    output_file: String,
    /// Compress with the given tree file instead of building one from the input
    #[arg(short = 't', long = "use-tree")]
    use_tree: Option<String>,
    /// Properties file with blocksize, loglevel and maxheaderlen
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Clone, Copy, Debug)]
enum Mode {
    BuildTree,
    Compress,
    Decompress,
}

struct InvalidMode(String);

impl fmt::Display for InvalidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid mode: {}, mode should be either build_tree, compress or decompress", self.0)
    }
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build_tree" => Ok(Mode::BuildTree),
            "compress" => Ok(Mode::Compress),
            "decompress" => Ok(Mode::Decompress),
            other => Err(InvalidMode(other.to_string())),
        }
    }
}

fn run(mode: Mode, args: &Args, props: &Properties) -> huffman_rust::Result<()> {
    let input = Path::new(&args.input_file);
    let output = Path::new(&args.output_file);

    if args.use_tree.is_some() && !matches!(mode, Mode::Compress) {
        log::warn!("--use-tree is only used by compress, ignoring it");
    }

    match mode {
        Mode::BuildTree => files::build_tree(input, output, props).map(|_| ()),
        Mode::Compress => files::compress(input, output, args.use_tree.as_deref().map(Path::new), props).map(|_| ()),
        Mode::Decompress => files::decompress(input, output, props).map(|_| ()),
    }
}

fn main() {
    let args = Args::parse();

    logger::init(Properties::default().log_level);

    let props = match args.config.as_deref() {
        Some(config) => match Properties::load(Path::new(config)) {
            Ok(props) => props,
            Err(e) => {
                log::error!("{}", e);
                process::exit(1);
            }
        },
        None => Properties::default(),
    };
    logger::init(props.log_level);

    let mode = match args.mode.parse::<Mode>() {
        Ok(mode) => mode,
        Err(invalid) => {
            println!("{}", invalid);
            return;
        }
    };

    if let Err(e) = run(mode, &args, &props) {
        log::error!("{:?} failed: {}", mode, e);
        process::exit(1);
    }
}
