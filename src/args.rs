use clap::{Parser, Subcommand};

/// Random roll call for the classroom.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (directory, default 'data') Where the rosters, the history and the settings are stored.
    #[clap(short, long, value_parser, default_value = "data", global = true)]
    pub data_dir: String,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import the names in the first column of an Excel file (.xlsx or .xls) into the current class.
    Import {
        /// (file path) The spreadsheet to read.
        #[clap(value_parser)]
        file: String,
        /// (default: first worksheet) The name of the worksheet to use.
        #[clap(long, value_parser)]
        worksheet: Option<String>,
        /// (default 0) Number of leading rows to skip, for example a header row.
        #[clap(long, value_parser, default_value_t = 0)]
        skip_rows: usize,
        /// Import even when the names raise warnings.
        #[clap(short, long, takes_value = false)]
        yes: bool,
        /// Do not add names that the class already has.
        #[clap(long, takes_value = false)]
        skip_duplicates: bool,
    },
    /// Add names by hand, separated by commas.
    Add {
        #[clap(value_parser)]
        names: String,
        /// Add even when the names raise warnings.
        #[clap(short, long, takes_value = false)]
        yes: bool,
        /// Do not add names that the class already has.
        #[clap(long, takes_value = false)]
        skip_duplicates: bool,
    },
    /// Remove names from the current class.
    Remove {
        #[clap(value_parser, required = true)]
        names: Vec<String>,
    },
    /// Remove every name from the current class.
    Clear,
    /// Show the current class and its names.
    List,
    /// Manage classes.
    #[clap(subcommand)]
    Class(ClassCommand),
    /// Draw names from the current class and record the draw.
    Draw {
        /// (default: from the settings) How many names to draw.
        #[clap(short = 'n', long, value_parser)]
        count: Option<usize>,
        /// Allow the same name to come up more than once.
        #[clap(long, takes_value = false)]
        allow_repeat: bool,
        /// Never draw the same name twice.
        #[clap(long, takes_value = false)]
        no_repeat: bool,
    },
    /// Show or change the settings.
    Config {
        /// The number of names drawn by default.
        #[clap(short = 'n', long, value_parser)]
        count: Option<u32>,
        /// (true or false) Draw without repeating names by default.
        #[clap(long, value_parser)]
        prevent_duplicate: Option<bool>,
        /// The window geometry: x y width height.
        #[clap(long, value_parser, number_of_values = 4, allow_hyphen_values = true)]
        geometry: Option<Vec<i32>>,
    },
    /// Show the most recent draws.
    History {
        /// (default 20) How many draws to show.
        #[clap(short, long, value_parser, default_value_t = 20)]
        limit: usize,
        /// Delete the whole history instead.
        #[clap(long, takes_value = false)]
        clear: bool,
    },
    /// Show how often each name was drawn.
    Stats {
        /// (default 10) How many names to show.
        #[clap(short, long, value_parser, default_value_t = 10)]
        top: usize,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClassCommand {
    /// List the classes. The current class is marked with '*'.
    List,
    /// Create an empty class.
    Add {
        #[clap(value_parser)]
        name: String,
    },
    /// Rename a class.
    Rename {
        /// The new name.
        #[clap(value_parser)]
        new: String,
        /// (default: the current class) The class to rename.
        #[clap(long, value_parser)]
        from: Option<String>,
    },
    /// Delete a class (the current class by default).
    Delete {
        #[clap(value_parser)]
        name: Option<String>,
    },
    /// Make a class the current class.
    Use {
        #[clap(value_parser)]
        name: String,
    },
}
