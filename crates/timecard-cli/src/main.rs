mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "timecard",
    version,
    about = "Extract timesheet entries from PDF time reports into CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Report profile and extraction backend, shared by every PDF command.
#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// Predefined profile name (see `timecard profiles list`)
    #[arg(short, long, value_name = "NAME", conflicts_with = "profile_file")]
    profile: Option<String>,

    /// Custom JSON profile file
    #[arg(long, value_name = "FILE")]
    profile_file: Option<PathBuf>,

    /// Text extraction backend: pdftotext (default) or native
    #[arg(short, long, default_value = "pdftotext")]
    backend: String,

    /// Ask pdftotext to keep the physical layout
    #[arg(long)]
    layout: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract time entries from a PDF report and write them as CSV
    Extract {
        /// Path to the PDF report
        input_file: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Stdout format when no output file is given: csv (default), table or json
        #[arg(short, long, default_value = "csv")]
        output: String,

        /// Write the CSV to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Number of task descriptions to list in the summary
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Reconcile parsed entries against the report's printed grand total
    Audit {
        /// Path to the PDF report
        input_file: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Expected grand total (H:MM:SS); detected from the report if omitted
        #[arg(short, long, value_name = "H:MM:SS")]
        expected_total: Option<String>,

        /// Allowed difference in seconds
        #[arg(short, long, default_value_t = 10)]
        tolerance: u64,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show surrounding lines for every dropped candidate
        #[arg(long)]
        verbose: bool,
    },
    /// Sum the durations of an emitted CSV and compare with the expected total
    Verify {
        /// Path to the CSV file
        csv_file: PathBuf,

        /// Expected grand total (H:MM:SS); taken from the profile if omitted
        #[arg(short, long, value_name = "H:MM:SS")]
        expected_total: Option<String>,

        /// Allowed difference in seconds
        #[arg(short, long, default_value_t = 10)]
        tolerance: u64,

        /// Profile supplying the expected total
        #[arg(short, long, value_name = "NAME", conflicts_with = "profile_file")]
        profile: Option<String>,

        /// Custom JSON profile file
        #[arg(long, value_name = "FILE")]
        profile_file: Option<PathBuf>,
    },
    /// Print the flattened, numbered text lines of a PDF
    Lines {
        /// Path to the PDF report
        input_file: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Only show lines around this line number
        #[arg(long, value_name = "LINE")]
        around: Option<usize>,

        /// Number of lines to show on each side of --around
        #[arg(long, default_value_t = 3)]
        context: usize,

        /// Only show lines containing a duration
        #[arg(long)]
        durations: bool,
    },
    /// Manage and inspect report profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List predefined profiles
    List,
    /// Print a predefined profile as JSON
    Show {
        /// Preset name (e.g., "toggl-detailed")
        preset: String,
    },
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile file
        file: PathBuf,
    },
}

fn main() {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            source,
            output,
            out,
            top,
        } => commands::extract::run(input_file, &source.into(), &output, out, top),
        Commands::Audit {
            input_file,
            source,
            expected_total,
            tolerance,
            output,
            verbose,
        } => commands::audit::run(
            input_file,
            &source.into(),
            expected_total.as_deref(),
            tolerance,
            &output,
            verbose,
        ),
        Commands::Verify {
            csv_file,
            expected_total,
            tolerance,
            profile,
            profile_file,
        } => commands::verify::run(
            csv_file,
            expected_total.as_deref(),
            tolerance,
            profile.as_deref(),
            profile_file.as_deref(),
        ),
        Commands::Lines {
            input_file,
            source,
            around,
            context,
            durations,
        } => commands::lines::run(input_file, &source.into(), around, context, durations),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Show { preset } => commands::profiles::show(&preset),
            ProfilesAction::Validate { file } => commands::profiles::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

impl From<SourceArgs> for commands::Source {
    fn from(args: SourceArgs) -> Self {
        commands::Source {
            profile: args.profile,
            profile_file: args.profile_file,
            backend: args.backend,
            layout: args.layout,
        }
    }
}
