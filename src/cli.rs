use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the recipe catalog JSON file
    #[arg(short, long)]
    pub catalog_file: String,

    /// Path to a weekly plan JSON file; a demo plan is built when omitted
    #[arg(short, long)]
    pub plan_file: Option<String>,

    /// Path to the persisted user profile
    #[arg(long, default_value = "profile.json")]
    pub profile_file: String,

    /// Ask the suggestion service for extra recipes before aggregating
    #[arg(long)]
    pub suggest: bool,

    /// Maximum preparation time (minutes) for the discovery deck
    #[arg(long, default_value_t = 60)]
    pub max_prep_minutes: u32,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
