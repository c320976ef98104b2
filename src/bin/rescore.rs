use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;

use lattice_rescore::scorer::IdentityScorer;
use lattice_rescore::{beam_search, read_graph, trace_init, walk, DecodeResult};

#[derive(Parser)]
#[command(name = "rescore", about = "Re-decode search graphs under a scorer")]
struct Cli {
    /// Graph file, or a pattern containing {} expanded with 0, 1, 2, ...
    /// while matching files exist
    #[arg(short, long)]
    input: String,

    /// Output file (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Normalize scores by output length (exact walk only)
    #[arg(short, long)]
    normalize: bool,

    /// Use beam search with this beam width instead of the exact walk
    #[arg(short, long)]
    beam: Option<usize>,

    /// Emit JSON lines instead of "sentno score text"
    #[arg(long)]
    json: bool,
}

/// One decoded sentence, as emitted with `--json`.
#[derive(Serialize)]
struct OutputLine<'a> {
    sent_no: usize,
    score: f64,
    text: &'a str,
}

/// Expand `{}` in the input argument against existing files, or return the
/// literal path.
fn input_files(input: &str) -> Vec<(usize, PathBuf)> {
    if !input.contains("{}") {
        return vec![(0, PathBuf::from(input))];
    }
    let mut files = Vec::new();
    let mut sent_no = 0;
    loop {
        let path = PathBuf::from(input.replace("{}", &sent_no.to_string()));
        if !path.exists() {
            break;
        }
        files.push((sent_no, path));
        sent_no += 1;
    }
    files
}

fn main() {
    trace_init::init_tracing();
    let cli = Cli::parse();

    let files = input_files(&cli.input);
    if files.is_empty() {
        eprintln!("No graph files match pattern {}", cli.input);
        process::exit(1);
    }

    let mut out: BufWriter<Box<dyn Write>> = BufWriter::new(match &cli.output {
        Some(path) => match fs::File::create(path) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("Failed to create output file {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Box::new(std::io::stdout()),
    });

    let scorer = IdentityScorer;
    let mut decoded = 0;

    for (sent_no, path) in &files {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Failed to open graph file {}: {}", path.display(), e);
                process::exit(1);
            }
        };

        let graph = match read_graph(BufReader::new(file), *sent_no) {
            Ok(graph) => graph,
            Err(e) => {
                eprintln!("sentence {}: {}", sent_no, e);
                continue;
            }
        };

        let result = match cli.beam {
            Some(beam) => beam_search(&graph, &scorer, beam),
            None => walk(&graph, &scorer, cli.normalize),
        };
        match result {
            Ok(best) => {
                write_result(&mut out, *sent_no, &best, cli.json);
                decoded += 1;
            }
            Err(e) => eprintln!("sentence {}: {}", sent_no, e),
        }
    }

    if out.flush().is_err() || decoded == 0 {
        process::exit(1);
    }
}

fn write_result(out: &mut impl Write, sent_no: usize, best: &DecodeResult, json: bool) {
    let written = if json {
        let line = OutputLine {
            sent_no,
            score: best.score,
            text: &best.text,
        };
        // Serialization of this struct cannot fail; only the write can.
        let line = serde_json::to_string(&line).unwrap_or_default();
        writeln!(out, "{}", line)
    } else {
        writeln!(out, "{} {} {}", sent_no, best.score, best.text)
    };
    if let Err(e) = written {
        eprintln!("Failed to write output: {}", e);
        process::exit(1);
    }
}
