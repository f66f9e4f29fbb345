use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use roster_tools::io::excel_read::{self, ColumnRef};
use roster_tools::io::excel_write;
use roster_tools::io::roster;
use roster_tools::monitor::devtools::{DevtoolsClient, PageSession};
use roster_tools::monitor::{self, CancelToken, MonitorConfig};
use roster_tools::reconcile::{self, EmailIndex, SheetEmails};
use roster_tools::{Result, ToolError, console, report};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;
    match cli.command {
        Command::Compare(args) => execute_compare(args),
        Command::ReadEmails(args) => execute_read_emails(args),
        Command::ExportRoster(args) => execute_export_roster(args),
        Command::Monitor(args) => execute_monitor(args),
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        // Keep stdout clean for the report tables.
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_compare(args: CompareArgs) -> Result<()> {
    if !args.workbook.exists() {
        return Err(ToolError::MissingInput(args.workbook));
    }

    let roster = roster::load_roster(&args.data_dir)?;
    println!("从JSON文件中读取到 {} 个用户数据", roster.len());

    let column = ColumnRef::parse(&args.column);
    let mut sources = Vec::with_capacity(args.sheets.len());
    for sheet in &args.sheets {
        let emails = excel_read::read_column(&args.workbook, Some(sheet), &column)?;
        println!("\n{sheet}表中共有 {} 个邮箱", emails.len());
        sources.push(SheetEmails {
            sheet: sheet.clone(),
            emails,
        });
    }

    let show_details = console::confirm("是否显示详细信息（包括JSON数据、邮箱列表和重复邮箱）？")?;

    if show_details {
        println!("\nJSON文件中的用户数据:");
        println!("{}", report::roster_table(&roster));
        for source in &sources {
            println!("\n{}表中的邮箱:", source.sheet);
            println!("{}", report::email_grid(&source.emails));
        }
    }

    let index = EmailIndex::build(&sources);
    println!("\n总共收集到 {} 个邮箱", index.total());

    let result = reconcile::reconcile(&roster, &index);

    if result.duplicates.is_empty() {
        println!("\n未发现重复邮箱");
    } else {
        if show_details {
            println!("\n在所有表中重复出现的邮箱:");
            println!("{}", report::duplicates_table(&result.duplicates));
        }
        println!("\n总计发现 {} 个重复邮箱", result.duplicates.len());
    }

    if result.sheet_only.is_empty() {
        println!("\n所有邮箱都在JSON数据中找到了对应记录");
    } else {
        if show_details {
            println!("\n以下邮箱在JSON数据中未找到:");
            println!("{}", report::sheet_only_table(&result.sheet_only));
        }
        println!("\n总计有 {} 个邮箱在JSON数据中未找到", result.sheet_only.len());
    }

    if result.roster_only.is_empty() {
        println!("\nJSON数据中没有独有的邮箱，所有邮箱都在Excel表中存在");
    } else {
        if show_details {
            println!("\nJSON数据中独有的邮箱（不在Excel表中）:");
            println!("{}", report::roster_only_table(&result.roster_only));
        }
        println!("\n总计有 {} 个邮箱仅在JSON数据中存在", result.roster_only.len());
    }

    // Both reports are rewritten on every run, even when a class is empty,
    // so a previous run's rows never survive.
    write_report(
        &args.report_dir.join(report::NOT_FOUND_REPORT),
        &report::sheet_only_report(&result.sheet_only),
    )?;
    write_report(
        &args.report_dir.join(report::JSON_ONLY_REPORT),
        &report::roster_only_report(&result.roster_only),
    )?;
    Ok(())
}

fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    println!("结果已写入到文件: {}", path.display());
    Ok(())
}

fn execute_read_emails(args: ReadEmailsArgs) -> Result<()> {
    if !args.workbook.exists() {
        return Err(ToolError::MissingInput(args.workbook));
    }

    let column = ColumnRef::parse(&args.column);
    let emails = excel_read::read_column(&args.workbook, args.sheet.as_deref(), &column)?;
    for email in &emails {
        println!("{email}");
    }
    println!("共读取到 {} 个邮箱地址", emails.len());
    Ok(())
}

const ROSTER_HEADERS: [&str; 5] = ["team", "name", "email", "role", "lastUsed"];

fn execute_export_roster(args: ExportRosterArgs) -> Result<()> {
    let roster = roster::load_roster(&args.data_dir)?;
    let rows: Vec<Vec<String>> = roster
        .iter()
        .map(|entry| {
            vec![
                entry.team.clone(),
                entry.name.clone(),
                entry.email.clone(),
                entry.role.clone(),
                entry.last_used.clone(),
            ]
        })
        .collect();

    if args.output.exists() {
        excel_write::update_sheet(&args.output, &args.sheet, &ROSTER_HEADERS, &rows, false)?;
    } else {
        excel_write::write_sheet(&args.output, &args.sheet, &ROSTER_HEADERS, &rows)?;
    }
    println!("Excel文件已成功保存到: {}", args.output.display());
    println!("共导出 {} 条成员记录", rows.len());
    Ok(())
}

fn execute_monitor(args: MonitorArgs) -> Result<()> {
    let output = args.output.unwrap_or_else(|| {
        PathBuf::from("data").join(format!("team-{}-data.json", args.team))
    });

    println!("数据将保存到: {}", output.display());
    println!("监控团队: {}", args.team);
    if !args.yes && !console::confirm("是否开始执行?")? {
        println!("已取消执行");
        return Ok(());
    }

    let client = DevtoolsClient::new(&args.endpoint)?;
    println!("已连接到浏览器");
    let page = client.find_page(&args.url)?;
    println!("已找到目标页面: {}", page.url);
    let mut session = PageSession::connect(&page)?;

    let token = CancelToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|error| ToolError::Interrupt(error.to_string()))?;

    if args.continuous {
        println!("开始持续监控，每 {} 秒获取一次数据...", args.interval);
    }
    let config = MonitorConfig {
        team: args.team,
        output,
        interval: Duration::from_secs(args.interval),
        continuous: args.continuous,
    };
    monitor::run(&config, &mut session, &token)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile, export, and monitor team roster email lists."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile spreadsheet email columns against the roster snapshots.
    Compare(CompareArgs),
    /// Read one spreadsheet column and print the values.
    ReadEmails(ReadEmailsArgs),
    /// Flatten the roster snapshots into a workbook sheet.
    ExportRoster(ExportRosterArgs),
    /// Capture member rows from an open browser page into snapshot files.
    Monitor(MonitorArgs),
}

#[derive(clap::Args)]
struct CompareArgs {
    /// Workbook holding the email columns.
    #[arg(long)]
    workbook: PathBuf,

    /// Sheets to read the email column from, in order.
    #[arg(
        long = "sheet",
        default_values_t = [
            String::from("self-invited-users"),
            String::from("partner-invited"),
        ]
    )]
    sheets: Vec<String>,

    /// Column to read from each sheet: a letter or a header title.
    #[arg(long, default_value = "A")]
    column: String,

    /// Directory holding the `team-<team>-data.json` snapshot files.
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Directory the two report files are written into.
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,
}

#[derive(clap::Args)]
struct ReadEmailsArgs {
    /// Workbook to read from.
    #[arg(long)]
    workbook: PathBuf,

    /// Column to read: a letter or a header title.
    #[arg(long, default_value = "A")]
    column: String,

    /// Sheet name; the first sheet when omitted.
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(clap::Args)]
struct ExportRosterArgs {
    /// Directory holding the snapshot files.
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Workbook to write.
    #[arg(long)]
    output: PathBuf,

    /// Sheet name for the exported roster.
    #[arg(long, default_value = "Roster")]
    sheet: String,
}

#[derive(clap::Args)]
struct MonitorArgs {
    /// Remote-debugging endpoint of the running browser.
    #[arg(long, default_value = "http://127.0.0.1:9222")]
    endpoint: String,

    /// URL fragment identifying the already-open page to scrape.
    #[arg(long, default_value = "https://www.cursor.com/settings")]
    url: String,

    /// Team label stored in each snapshot.
    #[arg(long)]
    team: String,

    /// Snapshot file; defaults to `data/team-<team>-data.json`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seconds between polls in continuous mode.
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Keep polling until interrupted instead of capturing once.
    #[arg(long)]
    continuous: bool,

    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
}
