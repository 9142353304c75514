use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Compute realized capital-gains returns from a DEGIRO CSV export
    Compute {
        /// Input CSV file path
        #[arg(long, required_unless_present = "schema")]
        input: Option<PathBuf>,

        /// Window start date, `dd/mm/YYYY` (exclusive)
        #[arg(long)]
        start: Option<String>,

        /// Window end date, `dd/mm/YYYY` (exclusive)
        #[arg(long)]
        end: Option<String>,

        /// Print the output JSON Schema instead of computing
        #[arg(long)]
        schema: bool,
    },
}
