use cadence_core::models::{ActionStatus, ExceptionReason, NoteType};
use clap::{Parser, Subcommand, ValueEnum};

/// Plan actions, expand their recurrences and browse the calendar
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the HTTP API
    Serve(ServeCommand),
    /// Add a new action
    Add(AddCommand),
    /// Edit an action and regenerate its occurrences
    Edit(EditCommand),
    /// Delete an action with its occurrences and notes
    Delete(DeleteCommand),
    /// Show the calendar between two dates
    Range(RangeCommand),
    /// Show a single event by action or occurrence id
    Show(ShowCommand),
    /// Regenerate occurrences for every action
    Repair,
    /// Manage notes on a single occurrence
    Note(NoteCommand),
    /// Skip a date of an action, or list its skipped dates
    Skip(SkipCommand),
    /// Manage categories
    Category(CategoryCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeCommand {
    /// Address to bind (defaults to the configured server.host)
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind (defaults to the configured server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// What the action is
    pub text: String,
    /// Date of a single-day action, or the first day of a range
    #[arg(short, long, visible_alias = "start")]
    pub date: Option<String>,
    /// Last day of the range; turns the action into a date range
    #[arg(short, long)]
    pub end: Option<String>,
    /// Recurrence pattern (daily, weekly, monthly, yearly, weekdays, weekends)
    #[arg(long, conflicts_with = "on")]
    pub every: Option<String>,
    /// Days of week for a weekday-set pattern (e.g. mon,wed,fri)
    #[arg(long)]
    pub on: Option<String>,
    /// Stop the recurrence after this date
    #[arg(long)]
    pub until: Option<String>,
    /// Time of day (e.g. '9:30', '2pm', '14.5')
    #[arg(long)]
    pub at: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Duration such as '45m', '2h' or '1d'
    #[arg(long)]
    pub duration: Option<String>,
    /// Category name
    #[arg(short, long)]
    pub category: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub leverage: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique prefix) of the action to edit
    pub id: String,

    #[arg(long)]
    pub text: Option<String>,

    #[arg(long, visible_alias = "start")]
    pub date: Option<String>,
    #[arg(long, conflicts_with = "date")]
    pub date_clear: bool,

    #[arg(long)]
    pub end: Option<String>,
    #[arg(long, conflicts_with = "end")]
    pub end_clear: bool,

    #[arg(long, conflicts_with = "on")]
    pub every: Option<String>,
    #[arg(long)]
    pub on: Option<String>,
    #[arg(long, conflicts_with_all = ["every", "on"], help = "Remove the recurrence pattern")]
    pub every_clear: bool,

    #[arg(long)]
    pub until: Option<String>,
    #[arg(long, conflicts_with = "until")]
    pub until_clear: bool,

    #[arg(long)]
    pub at: Option<String>,
    #[arg(long, conflicts_with = "at")]
    pub at_clear: bool,

    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, conflicts_with = "location")]
    pub location_clear: bool,

    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long, conflicts_with = "duration")]
    pub duration_clear: bool,

    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, conflicts_with = "category")]
    pub category_clear: bool,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique prefix) of the action to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RangeCommand {
    /// First day to show (defaults to today)
    pub start: Option<String>,
    /// Last day to show (defaults to six days after the start)
    pub end: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// An action ID (or unique prefix) or a full occurrence ID
    pub id: String,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub command: NoteSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteSubcommand {
    /// Attach a note to an action's occurrence on a date
    Add(AddNoteCommand),
    /// List the notes of an action's occurrence on a date
    List(ListNotesCommand),
    /// Delete a note by ID
    Delete(DeleteNoteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddNoteCommand {
    /// The action ID (or unique prefix)
    pub action: String,
    /// Date of the occurrence
    pub date: String,
    /// The note text
    pub text: String,
    #[arg(long = "type", value_enum)]
    pub note_type: Option<NoteTypeArg>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListNotesCommand {
    pub action: String,
    pub date: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteNoteCommand {
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SkipCommand {
    /// The action ID (or unique prefix)
    pub action: String,
    /// Date to skip; omit to list the action's exceptions
    pub date: Option<String>,
    #[arg(long, value_enum, default_value = "skipped")]
    pub reason: ReasonArg,
    #[arg(long)]
    pub notes: Option<String>,
    /// Bring a previously skipped date back
    #[arg(long, requires = "date")]
    pub undo: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategorySubcommand {
    /// Add a new category
    Add(AddCategoryCommand),
    /// List categories
    List,
    /// Delete a category; its actions keep existing without one
    Delete(DeleteCategoryCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCategoryCommand {
    pub name: String,
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCategoryCommand {
    /// The name of the category to delete
    pub name: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    New,
    Planned,
    InProgress,
    Leveraged,
    Completed,
    Cancelled,
    NotNeeded,
    Moved,
}

impl From<StatusArg> for ActionStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::New => ActionStatus::New,
            StatusArg::Planned => ActionStatus::Planned,
            StatusArg::InProgress => ActionStatus::InProgress,
            StatusArg::Leveraged => ActionStatus::Leveraged,
            StatusArg::Completed => ActionStatus::Completed,
            StatusArg::Cancelled => ActionStatus::Cancelled,
            StatusArg::NotNeeded => ActionStatus::NotNeeded,
            StatusArg::Moved => ActionStatus::Moved,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTypeArg {
    Progress,
    Remark,
}

impl From<NoteTypeArg> for NoteType {
    fn from(arg: NoteTypeArg) -> Self {
        match arg {
            NoteTypeArg::Progress => NoteType::Progress,
            NoteTypeArg::Remark => NoteType::Remark,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonArg {
    Skipped,
    Moved,
    Cancelled,
}

impl From<ReasonArg> for ExceptionReason {
    fn from(arg: ReasonArg) -> Self {
        match arg {
            ReasonArg::Skipped => ExceptionReason::Skipped,
            ReasonArg::Moved => ExceptionReason::Moved,
            ReasonArg::Cancelled => ExceptionReason::Cancelled,
        }
    }
}
