use clap::{Parser, Subcommand};
use foliodb::document::Document;
use foliodb::executor::ResultData;
use foliodb::runner::Runner;
use foliodb::{Database, bookstore};

#[derive(Parser, Debug)]
#[command(
    name = "foliodb",
    version,
    about = "Run the bookstore query catalog against an embedded document store",
    long_about = None
)]
struct Cli {
    /// Emit machine-readable JSON instead of the human report
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed the sample books and run every catalog operation in order
    Run,
    /// List the catalog operations without executing them
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    foliodb::logger::init_from_env()?;
    let cli = Cli::parse();
    match cli.command {
        Commands::List => {
            for descriptor in bookstore::catalog() {
                println!("{:>2}. {}", descriptor.id, descriptor.label);
            }
        }
        Commands::Run => {
            let db = Database::new();
            let col = db.create_collection(bookstore::COLLECTION);
            for data in bookstore::sample_books() {
                col.insert_document(Document::new(data));
            }
            let report = Runner::new(col, bookstore::catalog()).run();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for envelope in &report.envelopes {
                    let status = if envelope.is_ok() { "ok" } else { "FAIL" };
                    println!(
                        "{:>2}. [{status}] {} {}",
                        envelope.descriptor_id,
                        envelope.label,
                        summarize(&envelope.data)
                    );
                    if let Some(failure) = &envelope.error {
                        println!("      {}", failure.message);
                    }
                }
                println!("{} passed, {} failed", report.passed(), report.failed());
            }
            if report.failed() > 0 {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn summarize(data: &ResultData) -> String {
    match data {
        ResultData::Documents(docs) => format!("({} docs)", docs.len()),
        ResultData::Update { matched, modified } => {
            format!("(matched {matched}, modified {modified})")
        }
        ResultData::Delete { deleted } => format!("(deleted {deleted})"),
        ResultData::Index { name } => format!("(index {name})"),
        ResultData::Explain(stats) => format!(
            "(examined {}, returned {}, index {})",
            stats.docs_examined,
            stats.n_returned,
            stats.index_used.as_deref().unwrap_or("none")
        ),
        ResultData::None => String::new(),
    }
}
