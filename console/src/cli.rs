use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "student-console", version, about = "Student management console")]
pub struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// End the session, locally and on the server.
    Logout,
    /// Show the locally stored session.
    Whoami,
    /// Refresh the signed-in user's profile from the server.
    Profile,
    /// Register a new student account.
    Register(RegisterArgs),
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// Replace the stored token; an empty value signs out locally.
    SetToken { token: String },
    /// Majors open for registration.
    Majors,
    /// Where an attempt to open a console location would land.
    Route { path: String },
    #[command(subcommand)]
    Account(EntityCommand),
    #[command(subcommand)]
    Course(EntityCommand),
    #[command(subcommand)]
    Major(EntityCommand),
    #[command(subcommand)]
    Enrollment(EnrollmentCommand),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub major_id: i64,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub phone: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub enrollment_date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EntityCommand {
    List,
    Get { id: i64 },
    /// Create or update from a JSON object.
    Save { json: String },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum EnrollmentCommand {
    /// Courses a student has selected.
    Selected { student_id: i64 },
    Select { student_id: i64, course_id: i64 },
    Drop { student_id: i64, course_id: i64 },
    Credits { student_id: i64 },
    All,
    ByStudent { student_id: i64 },
    ByCourse { course_id: i64 },
    Statistics,
}
