use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use inventory_tools::address::IpPolicy;
use inventory_tools::config::ConversionConfig;
use inventory_tools::io::inventory_write::{self, OutputFormat};
use inventory_tools::sync;
use inventory_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing(cli.verbose) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
    match run(cli) {
        Ok(Outcome::Success) => {}
        Ok(Outcome::RowsSkipped(count)) => {
            eprintln!("error: {count} row(s) skipped in strict mode");
            std::process::exit(2);
        }
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

enum Outcome {
    Success,
    RowsSkipped(usize),
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Command::Convert(args) => execute_convert(args),
        Command::Hosts(args) => execute_hosts(args),
        Command::Template(args) => {
            sync::write_template(&args.output, args.group_column.as_deref())?;
            println!("Created template: {}", args.output.display());
            Ok(Outcome::Success)
        }
    }
}

fn execute_convert(args: ConvertArgs) -> Result<Outcome> {
    let config = args.resolve_config()?;
    let format = args
        .format
        .map(OutputFormat::from)
        .or_else(|| inventory_write::detect_format(&args.output))
        .unwrap_or_default();

    let report = sync::excel_to_inventory(&args.input, &args.output, &config, format)?;

    if let Some(path) = &args.report {
        inventory_write::write_report(path, &report)?;
    }

    println!("Created inventory: {}", args.output.display());
    println!("Hosts added: {}, rows skipped: {}", report.accepted, report.skipped);
    for skipped in &report.reasons {
        println!("  row {}: {}", skipped.row, skipped.reason);
    }
    if report.empty_inventory {
        println!("Warning: the inventory contains no hosts");
    }

    if args.strict && report.skipped > 0 {
        return Ok(Outcome::RowsSkipped(report.skipped));
    }
    Ok(Outcome::Success)
}

fn execute_hosts(args: HostsArgs) -> Result<Outcome> {
    let column = match args.column {
        Some(column) => column,
        None => {
            let grid = sync::load_grid(&args.input, args.sheet.as_deref())?;
            let headers: Vec<String> = grid
                .header_names()
                .into_iter()
                .filter(|name| !name.is_empty())
                .collect();
            prompt_for_column(&headers)?
        }
    };

    let list = sync::excel_to_hosts_list(&args.input, &args.output, &column, args.sheet.as_deref())?;
    let count = list.hosts.split(',').filter(|host| !host.is_empty()).count();
    println!("Created {} with {count} host(s)", args.output.display());
    Ok(Outcome::Success)
}

fn prompt_for_column(headers: &[String]) -> Result<String> {
    println!("Columns: {}", headers.join(", "));
    print!("Enter the name of the hosts column: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Turn a spreadsheet of hosts into an automation inventory."
)]
struct Cli {
    /// Log debug details of every processed row.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a host workbook into an inventory document.
    Convert(ConvertArgs),
    /// Export a single column as a comma-separated host list.
    Hosts(HostsArgs),
    /// Write an empty host workbook with the expected columns.
    Template(TemplateArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Input workbook path.
    #[arg(long)]
    input: PathBuf,

    /// Output inventory path.
    #[arg(long, default_value = "inventory.yml")]
    output: PathBuf,

    /// YAML or JSON file with conversion settings. Flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worksheet to read instead of the first one.
    #[arg(long)]
    sheet: Option<String>,

    /// Header name that must be present. Repeat for several columns.
    #[arg(long = "require")]
    required_fields: Vec<String>,

    /// Column whose values place hosts into child groups.
    #[arg(long)]
    group_column: Option<String>,

    /// User assigned to every host.
    #[arg(long)]
    user: Option<String>,

    /// How masked addresses are reduced to a host address.
    #[arg(long, value_enum)]
    ip_policy: Option<IpPolicyKind>,

    /// Emit each host's prefix length.
    #[arg(long)]
    expose_mask: bool,

    /// Validate rows in parallel.
    #[arg(long)]
    parallel: bool,

    /// Output serialisation. Guessed from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<OutputFormatKind>,

    /// Write the run report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Exit with a non-zero status when any row was skipped.
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Args)]
struct HostsArgs {
    /// Input workbook path.
    #[arg(long)]
    input: PathBuf,

    /// Column holding the hosts. Prompted for when omitted.
    #[arg(long)]
    column: Option<String>,

    /// Output path.
    #[arg(long, default_value = "hosts.yml")]
    output: PathBuf,

    /// Worksheet to read instead of the first one.
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(clap::Args)]
struct TemplateArgs {
    /// Output workbook path.
    #[arg(long, default_value = "hosts.xlsx")]
    output: PathBuf,

    /// Add a grouping column with this header.
    #[arg(long)]
    group_column: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum IpPolicyKind {
    LiteralStrip,
    NetworkBase,
}

impl From<IpPolicyKind> for IpPolicy {
    fn from(kind: IpPolicyKind) -> Self {
        match kind {
            IpPolicyKind::LiteralStrip => IpPolicy::LiteralStrip,
            IpPolicyKind::NetworkBase => IpPolicy::NetworkBase,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormatKind {
    Yaml,
    Json,
}

impl From<OutputFormatKind> for OutputFormat {
    fn from(kind: OutputFormatKind) -> Self {
        match kind {
            OutputFormatKind::Yaml => OutputFormat::Yaml,
            OutputFormatKind::Json => OutputFormat::Json,
        }
    }
}

impl ConvertArgs {
    fn resolve_config(&self) -> Result<ConversionConfig> {
        let mut config = match &self.config {
            Some(path) => ConversionConfig::load(path)?,
            None => ConversionConfig::default(),
        };
        if self.sheet.is_some() {
            config.sheet = self.sheet.clone();
        }
        if !self.required_fields.is_empty() {
            config.required_fields = self.required_fields.clone();
        }
        if self.group_column.is_some() {
            config.group_column = self.group_column.clone();
        }
        if let Some(user) = &self.user {
            config.default_user = user.clone();
        }
        if let Some(policy) = self.ip_policy {
            config.ip_policy = policy.into();
        }
        config.expose_mask |= self.expose_mask;
        config.parallel |= self.parallel;
        config.validate()?;
        Ok(config)
    }
}
