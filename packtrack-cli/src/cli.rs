use clap::{Parser, Subcommand, ValueEnum};
use packtrack_order::{CategoryFilter, StatusFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "packtrack")]
#[command(
    about = "Track packing progress of orders imported from form-response CSV exports",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import one or more CSV exports
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List orders, optionally filtered
    List {
        /// Case-insensitive text matched against every column
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        #[arg(long, value_enum, default_value_t = CategoryArg::All)]
        category: CategoryArg,
    },

    /// Mark an order as packed
    Pack { id: u64 },

    /// Move an order back to pending
    Unpack { id: u64 },

    /// Flip an order between pending and packed
    Toggle { id: u64 },

    /// Replace the notes of an order
    Note { id: u64, text: String },

    /// Write packed orders to a CSV file
    Export {
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Show pending/packed counts
    Stats,

    /// Print a diagnostic summary of the stored data
    Debug,

    /// Remove every order and reset ids
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    All,
    Pending,
    Packed,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Pending => StatusFilter::Pending,
            StatusArg::Packed => StatusFilter::Packed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    All,
    Pickup,
    Delivery,
}

impl From<CategoryArg> for CategoryFilter {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => CategoryFilter::All,
            CategoryArg::Pickup => CategoryFilter::Pickup,
            CategoryArg::Delivery => CategoryFilter::Delivery,
        }
    }
}
