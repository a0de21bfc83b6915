use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use trivia_quiz::quiz::{acquire_questions, decode, Category, Difficulty, OpenTdb, Question};
use trivia_quiz::settings::OPEN_TRIVIA_URL;
use trivia_quiz::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Trivia API endpoint
    #[clap(long, default_value = OPEN_TRIVIA_URL)]
    trivia_url: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a quiz the way the web app does and print it as CSV
    Preview {
        /// Category id or `any`
        #[clap(long, default_value = "any")]
        category: Category,
        /// any, easy, medium or hard
        #[clap(long, default_value = "any")]
        difficulty: Difficulty,
        #[clap(long, default_value_t = 5)]
        amount: usize,
        /// Write to this file instead of stdout
        #[clap(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct PreviewRow {
    number: usize,
    question: String,
    answers: String,
    correct: String,
    media: String,
}

impl PreviewRow {
    fn new(number: usize, question: &Question) -> Self {
        Self {
            number,
            question: decode(&question.text),
            answers: question.answers.iter().map(|a| decode(a)).join(" | "),
            correct: decode(question.correct_answer()),
            media: question
                .media
                .as_ref()
                .map(|media| media.url.clone())
                .unwrap_or_default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Preview {
            category,
            difficulty,
            amount,
            out,
        } => {
            let source = OpenTdb::new(cli.trivia_url);
            let mut rng = StdRng::from_entropy();
            let questions =
                acquire_questions(&source, &mut rng, category, difficulty, amount).await?;
            let rows = questions
                .iter()
                .enumerate()
                .map(|(idx, question)| PreviewRow::new(idx + 1, question))
                .collect();
            match out {
                Some(path) => write_to(std::fs::File::create(path)?, rows)?,
                None => write_to(std::io::stdout().lock(), rows)?,
            }
        }
    }
    Ok(())
}

fn write_to(writer: impl Write, data: Vec<PreviewRow>) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}
