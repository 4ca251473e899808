//! prdflow CLI entry point.
//!
//! Every subcommand prints a single JSON document to stdout containing
//! `"ok": true` on success or `"ok": false` plus `"error"` with exit code 1
//! on failure. Logging goes to stderr (RUST_LOG controls verbosity).

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use prdflow::init::InitMethod;
use prdflow::paths;

mod cmd;

#[derive(Parser)]
#[command(
    name = "prdflow",
    version,
    about = "Deterministic automation for PRD-driven task workflows",
    long_about = "prdflow performs the mechanical half of a PRD-to-tasks workflow: \
                  PRD quality scoring, task-count arithmetic, task store manipulation, \
                  and crash-recovery bookkeeping. All output is JSON on stdout."
)]
struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the project environment (taskmaster, PRD, tasks, crash state)
    Preflight,

    /// Detect the available taskmaster method (MCP > CLI > none)
    DetectTaskmaster,

    /// Initialize a taskmaster project
    InitTaskmaster {
        /// Initialization method
        #[arg(long, value_enum)]
        method: InitMethod,
    },

    /// Print a bundled PRD template
    LoadTemplate {
        /// Template type
        #[arg(long = "type", default_value = "comprehensive")]
        template_type: String,
    },

    /// Run the 13-check quality checklist against a PRD file
    ValidatePrd {
        /// Path to the PRD file
        #[arg(long)]
        input: PathBuf,
    },

    /// Recommend an implementation task count for a requirement count
    CalcTasks {
        /// Number of requirements in the PRD
        #[arg(long)]
        requirements: u32,
    },

    /// Generate user-validation checkpoint tasks (one per 5 tasks)
    GenTestTasks {
        /// Total number of implementation tasks
        #[arg(long)]
        total: u32,
    },

    /// Write the bundled automation scripts into a project
    GenScripts {
        /// Output directory (defaults to .taskmaster/scripts under the root)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Create a timestamped backup of a PRD file
    BackupPrd {
        /// Path to the PRD file
        #[arg(long)]
        input: PathBuf,
    },

    /// Append a completion entry to the progress log
    LogProgress {
        /// Task id
        #[arg(long)]
        task_id: String,
        /// Task title
        #[arg(long)]
        title: String,
        /// Time spent, free-form
        #[arg(long)]
        duration: Option<String>,
        /// Subtask summary, free-form
        #[arg(long)]
        subtasks: Option<String>,
        /// Test result summary, free-form
        #[arg(long)]
        tests: Option<String>,
        /// Issues encountered, free-form
        #[arg(long)]
        issues: Option<String>,
    },

    /// Execution state for crash recovery
    #[command(subcommand)]
    State(StateCommands),

    /// Per-task time tracking
    #[command(subcommand)]
    Track(TrackCommands),

    /// Task store listings and research expansion
    #[command(subcommand)]
    Tasks(TaskCommands),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Print the crash-recovery summary
    Status,
    /// Mark a task run as started
    Start {
        #[arg(long)]
        task: Option<String>,
        #[arg(long)]
        subtask: Option<String>,
        /// Execution mode recorded with the run
        #[arg(long, default_value = "sequential")]
        mode: String,
    },
    /// Mark a task as completed and return to idle
    Complete {
        #[arg(long)]
        task: Option<String>,
    },
    /// Record a checkpoint without changing the run status
    Checkpoint {
        #[arg(long)]
        task: Option<String>,
    },
}

#[derive(Subcommand)]
enum TrackCommands {
    /// Record a start timestamp for a task
    Start {
        #[arg(long)]
        task: String,
        #[arg(long)]
        subtask: Option<String>,
    },
    /// Record a completion timestamp and derive the duration
    Complete {
        #[arg(long)]
        task: String,
        #[arg(long)]
        subtask: Option<String>,
    },
    /// Aggregate durations across completed tasks
    Report,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List all tasks with expansion status
    List {
        /// Path to tasks.json (default: conventional locations under the root)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Generate a research prompt for a task
    GenPrompt {
        #[arg(long)]
        task_id: String,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Path to the PRD for context (default: .taskmaster/docs/prd.md)
        #[arg(long)]
        prd: Option<PathBuf>,
    },
    /// Write research results back into a task
    WriteResearch {
        #[arg(long)]
        task_id: String,
        /// Path to the research file, or - for stdin
        #[arg(long)]
        research: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show which tasks have research expansion
    Status {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = cli.root.as_path();
    match cli.command {
        Commands::Preflight => cmd::project::preflight(root),
        Commands::DetectTaskmaster => cmd::project::detect_taskmaster(root),
        Commands::InitTaskmaster { method } => cmd::project::init_taskmaster(root, method),
        Commands::LoadTemplate { template_type } => cmd::docs::load_template(&template_type),
        Commands::ValidatePrd { input } => cmd::validate::validate_prd(&input),
        Commands::CalcTasks { requirements } => cmd::plan::calc_tasks(requirements),
        Commands::GenTestTasks { total } => cmd::plan::gen_test_tasks(total),
        Commands::GenScripts { output_dir } => {
            let dir = output_dir.unwrap_or_else(|| root.join(paths::SCRIPTS_DIR));
            cmd::project::gen_scripts(&dir)
        }
        Commands::BackupPrd { input } => cmd::docs::backup_prd(&input),
        Commands::LogProgress {
            task_id,
            title,
            duration,
            subtasks,
            tests,
            issues,
        } => cmd::docs::log_progress(root, &task_id, &title, duration, subtasks, tests, issues),
        Commands::State(state) => match state {
            StateCommands::Status => cmd::state::status(root),
            StateCommands::Start {
                task,
                subtask,
                mode,
            } => cmd::state::start(root, task.as_deref(), subtask.as_deref(), &mode),
            StateCommands::Complete { task } => cmd::state::complete(root, task.as_deref()),
            StateCommands::Checkpoint { task } => cmd::state::checkpoint(root, task.as_deref()),
        },
        Commands::Track(track) => match track {
            TrackCommands::Start { task, subtask } => {
                cmd::track::start(root, &task, subtask.as_deref())
            }
            TrackCommands::Complete { task, subtask } => {
                cmd::track::complete(root, &task, subtask.as_deref())
            }
            TrackCommands::Report => cmd::track::report(root),
        },
        Commands::Tasks(tasks) => match tasks {
            TaskCommands::List { file } => cmd::tasks::list(root, file.as_deref()),
            TaskCommands::GenPrompt {
                task_id,
                file,
                prd,
            } => cmd::tasks::gen_prompt(root, &task_id, file.as_deref(), prd.as_deref()),
            TaskCommands::WriteResearch {
                task_id,
                research,
                file,
            } => cmd::tasks::write_research(root, &task_id, &research, file.as_deref()),
            TaskCommands::Status { file } => cmd::tasks::status(root, file.as_deref()),
        },
        Commands::Completion { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        let doc = serde_json::json!({"ok": false, "error": err.to_string()});
        match serde_json::to_string_pretty(&doc) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{{\"ok\": false}}"),
        }
        std::process::exit(1);
    }
}
