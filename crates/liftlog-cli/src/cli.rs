use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use liftlog_core::VERSION;

/// LiftLog - A local-first training log for weightlifters
#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(long, global = true, env = "LIFTLOG_DB")]
    pub db: Option<String>,

    /// Account email to sign in as
    #[arg(short, long, global = true, env = "LIFTLOG_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long, global = true, hide = true, env = "LIFTLOG_TODAY")]
    pub today: Option<String>,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Set timezone used to decide "today" (e.g. Asia/Tokyo)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `signup` command
#[derive(Args)]
pub struct SignupArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Family name
    #[arg(long)]
    pub last_name: String,

    /// Given name
    #[arg(long)]
    pub first_name: String,

    /// Display name
    #[arg(long)]
    pub display_name: Option<String>,

    /// Disable interactive prompts (password from LIFTLOG_PASSWORD)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `passwd` command
#[derive(Args)]
pub struct PasswdArgs {
    /// Disable interactive prompts (new password from LIFTLOG_NEW_PASSWORD)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `users` command
#[derive(Args)]
pub struct UsersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `exercises` command
#[derive(Args)]
pub struct ExercisesArgs {
    /// Filter by category (WL or Training)
    #[arg(long)]
    pub category: Option<String>,

    /// Filter by major category
    #[arg(long)]
    pub major: Option<String>,

    /// Search by name (ignores the other filters)
    #[arg(long)]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `calendar` command
#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM, defaults to the current month)
    #[arg(long)]
    pub month: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `log show`
#[derive(Args)]
pub struct LogShowArgs {
    /// Log date (YYYY-MM-DD, or "today")
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `log save`
#[derive(Args)]
pub struct LogSaveArgs {
    /// Log date (YYYY-MM-DD, or "today")
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Set entry as NAME:WEIGHT:REPS:SETS (repeatable; replaces all sets)
    #[arg(short, long = "set", value_name = "SET")]
    pub sets: Vec<String>,

    /// Time-of-day slot (早朝, 午前, 午後, 夜 or early-morning, morning, afternoon, night)
    #[arg(long)]
    pub time_zone: Option<String>,

    /// Hours slept the night before
    #[arg(long)]
    pub sleep: Option<f64>,

    /// Nutrition summary as JSON
    #[arg(long, conflicts_with = "meal_photo")]
    pub nutrition_json: Option<String>,

    /// Meal photo to analyze and attach
    #[arg(long, value_name = "PHOTO")]
    pub meal_photo: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `log delete`
#[derive(Args)]
pub struct LogDeleteArgs {
    /// Log date (YYYY-MM-DD, or "today")
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `log list`
#[derive(Args)]
pub struct LogListArgs {
    /// Start date (YYYY-MM-DD, defaults to the first day of last month)
    #[arg(long)]
    pub since: Option<String>,

    /// End date (YYYY-MM-DD, defaults to the last day of this month)
    #[arg(long)]
    pub until: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum LogSubcommand {
    /// Show the log for a date
    Show(LogShowArgs),

    /// Create or replace the log for a date
    Save(LogSaveArgs),

    /// Delete the log for a date
    Delete(LogDeleteArgs),

    /// List logs in a date range
    List(LogListArgs),
}

/// Arguments for the `log` command group
#[derive(Args)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogSubcommand,
}

/// Arguments for the `analysis` command
#[derive(Args)]
pub struct AnalysisArgs {
    /// Range: week, month or all
    #[arg(long, default_value = "month")]
    pub range: String,

    /// Analyze another account (admin only)
    #[arg(long = "for", value_name = "EMAIL")]
    pub for_user: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Range: week, month or all
    #[arg(long, default_value = "month")]
    pub range: String,

    /// Export another account's logs (admin only)
    #[arg(long = "for", value_name = "EMAIL")]
    pub for_user: Option<String>,

    /// Output file (defaults to "{last} {first}_{yyyymmdd}.xlsx")
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `nutrition analyze`
#[derive(Args)]
pub struct NutritionAnalyzeArgs {
    /// Meal photo
    #[arg(value_name = "PHOTO")]
    pub photo: String,

    /// Attach the result to the log for this date
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum NutritionSubcommand {
    /// Estimate nutrition from a meal photo
    Analyze(NutritionAnalyzeArgs),
}

/// Arguments for the `nutrition` command group
#[derive(Args)]
pub struct NutritionArgs {
    #[command(subcommand)]
    pub command: NutritionSubcommand,
}

/// Arguments for `pb show`
#[derive(Args)]
pub struct PbShowArgs {
    /// Grade (中1 ... 社会人); all grades when omitted
    #[arg(long)]
    pub grade: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `pb set`
#[derive(Args)]
pub struct PbSetArgs {
    /// Grade (中1 ... 社会人)
    #[arg(long)]
    pub grade: String,

    /// Body weight (kg)
    #[arg(long)]
    pub body_weight: Option<f64>,

    /// Record as CODE=KG (repeatable; KG of 0 clears the record)
    #[arg(short, long = "record", value_name = "CODE=KG")]
    pub records: Vec<String>,
}

#[derive(Subcommand)]
pub enum PbSubcommand {
    /// Show personal bests
    Show(PbShowArgs),

    /// Update personal bests for a grade
    Set(PbSetArgs),
}

/// Arguments for the `pb` command group
#[derive(Args)]
pub struct PbArgs {
    #[command(subcommand)]
    pub command: PbSubcommand,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new store and config
    Init(InitArgs),

    /// Create an account
    Signup(SignupArgs),

    /// Change the signed-in account's password
    Passwd(PasswdArgs),

    /// List accounts (admin only)
    Users(UsersArgs),

    /// List catalog exercises
    Exercises(ExercisesArgs),

    /// Show the training calendar
    Calendar(CalendarArgs),

    /// Show, save, delete or list daily logs
    Log(LogArgs),

    /// Analyze training volume over a range
    Analysis(AnalysisArgs),

    /// Export logs to a spreadsheet
    Export(ExportArgs),

    /// Meal photo nutrition analysis
    Nutrition(NutritionArgs),

    /// Personal bests by grade
    Pb(PbArgs),

    /// Check store integrity
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
