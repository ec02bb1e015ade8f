use clap::{Parser, Subcommand};
use offlineimap_release::commands;
use offlineimap_release::core::error::{print_error, ReleaseError};

/// Make a new OfflineIMAP release
#[derive(Parser)]
#[command(name = "offlineimap-release")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the interactive release workflow
  Run,

  /// Manage the roster of people who tested the release
  #[command(subcommand)]
  Testers(TestersCommands),
}

#[derive(Subcommand)]
enum TestersCommands {
  /// Add a tester to the roster as pending
  Add {
    /// Tester's full name
    name: String,
    /// Tester's email address
    email: String,
  },

  /// Record a tested-by acknowledgment for the next release
  Ok {
    /// Email address of the tester
    email: String,
  },

  /// List the roster with per-tester status
  List,

  /// Return every tester to pending
  Reset,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Run => commands::run_release(),
    Commands::Testers(testers_cmd) => match testers_cmd {
      TestersCommands::Add { name, email } => commands::run_testers_add(name, email),
      TestersCommands::Ok { email } => commands::run_testers_ok(email),
      TestersCommands::List => commands::run_testers_list(),
      TestersCommands::Reset => commands::run_testers_reset(),
    },
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
