use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use std::path::Path;

use hampool::document;
use hampool::figures::FigureLibrary;
use hampool::output;
use hampool::parsing;
use hampool::pool::Pool;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("hampool")
        .version(VERSION)
        .propagate_version(true)
        .about("Convert amateur radio examination question pools to structured JSON.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("convert")
                .about("Parse the given question pool document and emit JSON")
                .arg(
                    Arg::new("images")
                        .long("images")
                        .value_name("DIR")
                        .help("Directory of figure images to embed in the output."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the JSON to FILE instead of standard output."),
                )
                .arg(
                    Arg::new("pretty")
                        .short('p')
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the JSON output."),
                )
                .arg(
                    Arg::new("exam-class")
                        .long("exam-class")
                        .value_name("CLASS")
                        .help("Exam class (technician, general, extra). Detected from the pool when omitted."),
                )
                .arg(
                    Arg::new("pool-year")
                        .long("pool-year")
                        .value_name("YEAR")
                        .help("Pool validity range, e.g. 2022-2026."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The .docx file containing the question pool."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse the given question pool document and report its structure")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The .docx file containing the question pool."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("convert", submatches)) => {
            let filename = submatches
                .get_one::<String>("filename")
                .unwrap();
            convert(
                Path::new(filename),
                submatches
                    .get_one::<String>("images")
                    .map(Path::new),
                submatches
                    .get_one::<String>("output")
                    .map(Path::new),
                submatches.get_flag("pretty"),
                submatches
                    .get_one::<String>("exam-class")
                    .cloned(),
                submatches
                    .get_one::<String>("pool-year")
                    .cloned(),
            );
        }
        Some(("check", submatches)) => {
            let filename = submatches
                .get_one::<String>("filename")
                .unwrap();
            check(Path::new(filename));
        }
        _ => {
            println!("usage: hampool [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn convert(
    filename: &Path,
    images: Option<&Path>,
    target: Option<&Path>,
    pretty: bool,
    exam_class: Option<String>,
    pool_year: Option<String>,
) {
    let mut pool = load_pool(filename);

    if let Some(directory) = images {
        let library = FigureLibrary::open(directory);
        pool.attach_figures(|reference| library.resolve(reference));
    }

    let document = output::assemble(&pool, exam_class, pool_year);
    if let Err(error) = output::write(&document, target, pretty) {
        eprintln!(
            "{}: {}",
            "error".bright_red(),
            error
        );
        std::process::exit(1);
    }

    if let Some(target) = target {
        eprintln!(
            "Wrote {} questions to {}",
            pool.questions()
                .len(),
            target.display()
        );
    }
}

fn check(filename: &Path) {
    let pool = load_pool(filename);

    let mut subelements = pool
        .subelements()
        .iter()
        .collect::<Vec<_>>();
    subelements.sort_by(|a, b| {
        a.id
            .cmp(&b.id)
    });

    for subelement in subelements {
        let questions: usize = subelement
            .groups()
            .iter()
            .map(|group| group.len())
            .sum();
        println!(
            "{}  {} ({} groups, {} questions)",
            subelement.id,
            subelement.title,
            subelement
                .groups()
                .len(),
            questions
        );
    }

    // A well-formed pool question offers exactly four choices; anything
    // else points at a mangled paragraph in the source document.
    let incomplete = pool
        .questions()
        .iter()
        .filter(|question| {
            question
                .answers
                .len()
                != 4
        })
        .collect::<Vec<_>>();

    for question in &incomplete {
        println!(
            "{}: {} has {} answer choices",
            "warning".bright_yellow(),
            question.id,
            question
                .answers
                .len()
        );
    }

    println!(
        "{} questions total",
        pool.questions()
            .len()
    );

    if !incomplete.is_empty() {
        std::process::exit(1);
    }
}

fn load_pool(filename: &Path) -> Pool {
    let paragraphs = match document::load(filename) {
        Ok(paragraphs) => paragraphs,
        Err(error) => {
            eprintln!(
                "{}: {}: {}",
                "error".bright_red(),
                error
                    .filename
                    .display(),
                error
                    .problem
                    .bold()
            );
            std::process::exit(1);
        }
    };

    parsing::parse(&paragraphs)
}
