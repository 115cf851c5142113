//! CLI binary for pdf2md-client.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, runs one operation against the service, and prints the
//! result. `browse` keeps a file list open and reads commands from stdin.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2md_client::display::{
    format_datetime, format_datetime_seconds, format_file_size, format_processing_time,
    item_range_label, short_id, status_label,
};
use pdf2md_client::error::{MSG_DELETE_FAILED, MSG_DETAIL_FAILED, MSG_UPDATE_FAILED};
use pdf2md_client::{
    ApiClient, ClientConfig, FileApi, FileDetail, FileListController, FileListObserver,
    FileListState, PageItem, PageSizeConfig, PaginationView, PdfUpload, SizeLimitPolicy,
    UploadSession, UploadState, ViewportTracker, MSG_CONFIRM_DELETE,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── List rendering ───────────────────────────────────────────────────────────

/// Render the list view to stdout after every state change.
struct TerminalObserver {
    quiet: bool,
}

impl FileListObserver for TerminalObserver {
    fn on_page_rejected(&self, page: u32) {
        if !self.quiet {
            eprintln!("{}", dim(&format!("page {page} is out of range")));
        }
    }

    fn on_delete_complete(&self, id: &str, ok: bool) {
        if !self.quiet && ok {
            eprintln!("{} deleted {}", green("✓"), id);
        }
    }

    fn on_state_changed(&self, state: &FileListState) {
        render_list(state);
    }
}

fn render_list(state: &FileListState) {
    // The previous page stays on screen until the fetch lands.
    if state.is_loading() {
        eprintln!("{}", dim("読み込み中..."));
        return;
    }

    let mut out = String::new();

    if let Some(err) = state.error() {
        out.push_str(&format!("{} {}\n", red("✗"), red(err)));
    }

    let Some(files) = state.files() else {
        print!("{out}");
        return;
    };

    out.push_str(&format!(
        "{}  {}\n",
        bold(&format!("ファイル一覧（{}件）", files.total_count)),
        dim(&format!("{}件/ページ表示", state.items_per_page())),
    ));

    if files.files.is_empty() {
        out.push_str("ファイルがありません\n");
        out.push_str(&dim("まだファイルがアップロードされていません。\n"));
    } else {
        out.push_str(&dim(&format!(
            "{:<4} {:<12} {:<32} {:<6} {:>9} {:>9}  {}\n",
            "#", "ID", "ファイル名", "状態", "サイズ", "処理時間", "作成日時"
        )));
        for (row, f) in files.files.iter().enumerate() {
            let marker = if state.deleting_file_id() == Some(f.id.as_str()) {
                cyan("⠿")
            } else {
                " ".to_string()
            };
            out.push_str(&format!(
                "{marker}{:<3} {:<12} {:<32} {:<6} {:>9} {:>9}  {}\n",
                row + 1,
                short_id(&f.id),
                f.filename,
                status_label(f.status),
                format_file_size(f.file_size),
                format_processing_time(f.processing_time),
                format_datetime(&f.created_at),
            ));
        }
    }

    if let Some(view) =
        PaginationView::new(state.current_page(), files.total_count, state.items_per_page())
    {
        let (start, end) = view.item_range();
        let pages: Vec<String> = view
            .pages()
            .into_iter()
            .map(|item| match item {
                PageItem::Page(_) if view.is_current(item) => bold(&format!("[{item}]")),
                _ => item.to_string(),
            })
            .collect();
        out.push_str(&format!(
            "{}   {} {} {}\n",
            item_range_label(start, end, files.total_count),
            if view.previous().is_some() { "‹ 前へ" } else { "" },
            pages.join(" "),
            if view.next().is_some() { "次へ ›" } else { "" },
        ));
    }

    print!("{out}");
    let _ = io::stdout().flush();
}

fn conversion_spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

// ── CLI definition ───────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Check the service is up
  pdf2md-client health

  # Upload a PDF and print the Markdown
  pdf2md-client upload report.pdf

  # Upload and save as converted-<id>.md in ./out
  pdf2md-client upload report.pdf -o out/

  # List page 2, sized for a 50-row terminal
  pdf2md-client list --page 2 --viewport-height 50

  # Show or save one file
  pdf2md-client show 3f2c9a...
  pdf2md-client show 3f2c9a... -o out/

  # Replace the PDF behind a file
  pdf2md-client update 3f2c9a... revised.pdf

  # Delete without the confirmation prompt
  pdf2md-client delete 3f2c9a... --yes

  # Interactive list
  pdf2md-client browse

BROWSE COMMANDS:
  n / p          next / previous page
  <number>       go to page
  v <row|id>     show a file's Markdown
  d <row|id>     delete a file (asks for confirmation)
  h <rows>       simulate a terminal resize to <rows> rows
  r              refresh
  q              quit

ENVIRONMENT VARIABLES:
  PDF2MD_API_URL          Base URL of the conversion API
  PDF2MD_TIMEOUT          Request timeout in seconds
  PDF2MD_VIEWPORT_HEIGHT  Terminal rows available to the list
  RUST_LOG                Override log filter (e.g. pdf2md_client=debug)
"#;

/// Upload PDFs to a conversion service and manage the converted Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md-client",
    version,
    about = "Upload PDFs to a PDF-to-Markdown service and manage the converted files",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Base URL of the conversion API.
    #[arg(long, global = true, env = "PDF2MD_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Request timeout in seconds (conversion happens inside the request).
    #[arg(long, global = true, env = "PDF2MD_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Only check file size before `update`, letting the server judge uploads.
    #[arg(long, global = true, env = "PDF2MD_SIZE_CHECK_UPDATE_ONLY")]
    size_check_update_only: bool,

    /// Output JSON instead of formatted text.
    #[arg(long, global = true, env = "PDF2MD_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except results and errors.
    #[arg(short, long, global = true, env = "PDF2MD_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the service is reachable.
    Health,

    /// Upload a PDF and convert it to Markdown.
    Upload {
        /// Local PDF file.
        file: PathBuf,
        /// Save the Markdown into this directory instead of printing it.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print one page of the file list.
    List {
        /// Page to show (1-based).
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Terminal rows available for the list view.
        #[arg(long, env = "PDF2MD_VIEWPORT_HEIGHT", default_value_t = 40)]
        viewport_height: u32,
    },

    /// Print a converted file's Markdown.
    Show {
        id: String,
        /// Save the Markdown as <id>.md in this directory instead of printing it.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the PDF behind a file and reconvert it.
    Update {
        id: String,
        /// Local PDF file.
        file: PathBuf,
    },

    /// Delete a file.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Browse the file list interactively.
    Browse {
        /// Terminal rows available for the list view.
        #[arg(long, env = "PDF2MD_VIEWPORT_HEIGHT", default_value_t = 40)]
        viewport_height: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let api = ApiClient::new(config.clone()).context("Failed to create HTTP client")?;

    match &cli.command {
        Command::Health => health(&cli, &api).await,
        Command::Upload { file, output } => {
            upload(&cli, &api, &config, file, output.as_deref()).await
        }
        Command::List {
            page,
            viewport_height,
        } => list(&cli, api, &config, *page, *viewport_height).await,
        Command::Show { id, output } => show(&cli, api, &config, id, output.as_deref()).await,
        Command::Update { id, file } => update(&cli, &api, &config, id, file).await,
        Command::Delete { id, yes } => delete(&cli, &api, id, *yes).await,
        Command::Browse { viewport_height } => browse(&cli, api, &config, *viewport_height).await,
    }
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let policy = if cli.size_check_update_only {
        SizeLimitPolicy::UpdateOnly
    } else {
        SizeLimitPolicy::All
    };
    ClientConfig::builder()
        .base_url(&cli.api_url)
        .timeout_secs(cli.timeout)
        .size_limit(policy)
        .page_size(PageSizeConfig::terminal())
        .build()
        .context("Invalid configuration")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialise output")?
    );
    Ok(())
}

fn print_markdown(markdown: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(markdown.as_bytes())
        .context("Failed to write to stdout")?;
    if !markdown.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

// ── Commands ─────────────────────────────────────────────────────────────────

async fn health(cli: &Cli, api: &ApiClient) -> Result<()> {
    let h = api.health().await.context("Health check failed")?;
    if cli.json {
        return print_json(&h);
    }
    println!("Status:   {}", h.status);
    println!("Version:  {}", h.version);
    if let Some(uptime) = h.uptime {
        println!("Uptime:   {uptime:.0}s");
    }
    Ok(())
}

async fn upload(
    cli: &Cli,
    api: &ApiClient,
    config: &ClientConfig,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let pdf = PdfUpload::from_path(file).await?;
    let mut session = UploadSession::new();

    if let Err(e) = session.begin(config, &pdf) {
        // Rejected locally; no request was sent.
        bail!(e.user_message(&e.to_string()));
    }
    let spinner = (session.state().is_loading() && !cli.quiet && !cli.json)
        .then(|| conversion_spinner(&format!("Converting {} …", pdf.filename())));
    let result = api.upload_pdf(pdf).await;
    session.finish(result);
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    match session.state() {
        UploadState::Done(resp) => {
            if cli.json {
                return print_json(resp);
            }
            if let Some(dir) = output {
                let path = pdf2md_client::upload::save_markdown(resp, dir).await?;
                if !cli.quiet {
                    eprintln!("{}  {}  →  {}", green("✔"), resp.id, bold(&path.display().to_string()));
                }
            } else {
                print_markdown(&resp.markdown)?;
                if !cli.quiet {
                    eprintln!("{} {}", green("✔"), dim(&format!("id {}", resp.id)));
                }
            }
            Ok(())
        }
        UploadState::Failed(msg) => bail!("{msg}"),
        UploadState::Idle | UploadState::Loading => bail!("upload did not complete"),
    }
}

async fn list(
    cli: &Cli,
    api: ApiClient,
    config: &ClientConfig,
    page: u32,
    viewport_height: u32,
) -> Result<()> {
    let mut controller = FileListController::new(api, config.page_size, viewport_height);
    if !cli.json {
        controller = controller.with_observer(Arc::new(TerminalObserver { quiet: cli.quiet }));
    }

    if page == 1 {
        controller.mount().await;
    } else {
        controller.fetch_files(page).await;
    }

    if let Some(err) = controller.state().error() {
        bail!("{err}");
    }
    if cli.json {
        if let Some(files) = controller.state().files() {
            print_json(files)?;
        }
    }
    Ok(())
}

async fn show(
    cli: &Cli,
    api: ApiClient,
    config: &ClientConfig,
    id: &str,
    output: Option<&Path>,
) -> Result<()> {
    let mut controller = FileListController::new(api, config.page_size, 0);
    let Some(file) = controller.view_file(id).await else {
        bail!("{}", controller.state().error().unwrap_or(MSG_DETAIL_FAILED));
    };
    let detail = FileDetail::new(file);

    if cli.json {
        return print_json(detail.file());
    }
    if let Some(dir) = output {
        let path = detail.save_markdown(dir).await?;
        if !cli.quiet {
            eprintln!("{}  {}", green("✔"), bold(&path.display().to_string()));
        }
        return Ok(());
    }

    if !cli.quiet {
        let f = detail.file();
        eprintln!("{}", bold("ファイル詳細"));
        eprintln!("  ID:        {}", f.id);
        if let Some(name) = &f.filename {
            eprintln!("  ファイル名: {name}");
        }
        eprintln!("  作成日時:   {}", format_datetime_seconds(&f.created_at));
        if let Some(updated) = &f.updated_at {
            eprintln!("  更新日時:   {}", format_datetime_seconds(updated));
        }
        eprintln!("  文字数:     {}", f.markdown.chars().count());
    }
    print_markdown(detail.markdown())
}

async fn update(
    cli: &Cli,
    api: &ApiClient,
    config: &ClientConfig,
    id: &str,
    file: &Path,
) -> Result<()> {
    let current = api
        .get_file(id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message(MSG_DETAIL_FAILED)))?;
    let mut detail = FileDetail::new(current);
    let pdf = PdfUpload::from_path(file).await?;

    let updated = if detail.begin_update(config, &pdf) {
        let spinner = (detail.is_updating() && !cli.quiet && !cli.json)
            .then(|| conversion_spinner(&format!("Reconverting {} …", pdf.filename())));
        let result = api.update_file(id, pdf).await;
        let updated = detail.finish_update(result).cloned();
        if let Some(bar) = &spinner {
            bar.finish_and_clear();
        }
        updated
    } else {
        None
    };

    let Some(updated) = updated else {
        bail!("{}", detail.update_error().unwrap_or(MSG_UPDATE_FAILED));
    };
    if cli.json {
        return print_json(&updated);
    }
    if !cli.quiet {
        eprintln!("{} updated {}", green("✔"), updated.id);
    }
    Ok(())
}

fn prompt_yes_no(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn delete(cli: &Cli, api: &ApiClient, id: &str, yes: bool) -> Result<()> {
    if !(yes || prompt_yes_no(MSG_CONFIRM_DELETE)) {
        if !cli.quiet {
            eprintln!("{}", dim("cancelled"));
        }
        return Ok(());
    }
    let resp = api
        .delete_file(id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message(MSG_DELETE_FAILED)))?;
    if cli.json {
        return print_json(&resp);
    }
    if !cli.quiet {
        eprintln!("{} deleted {}", green("✔"), id);
    }
    Ok(())
}

// ── Interactive browsing ─────────────────────────────────────────────────────

/// Resolve a row number on the current page or a literal id.
fn resolve_target(state: &FileListState, arg: &str) -> Option<String> {
    if let Ok(row) = arg.parse::<usize>() {
        return state
            .files()
            .and_then(|f| f.files.get(row.checked_sub(1)?))
            .map(|f| f.id.clone());
    }
    (!arg.is_empty()).then(|| arg.to_string())
}

async fn browse(cli: &Cli, api: ApiClient, config: &ClientConfig, viewport_height: u32) -> Result<()> {
    let mut controller = FileListController::new(api, config.page_size, viewport_height)
        .with_observer(Arc::new(TerminalObserver { quiet: cli.quiet }));
    let mut tracker = ViewportTracker::with_debounce(viewport_height, config.resize_debounce());
    let mut heights = tracker.subscribe();

    controller.mount().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("{} ", cyan("›"));
        let _ = io::stderr().flush();

        tokio::select! {
            changed = heights.changed() => {
                if changed.is_ok() {
                    let height = *heights.borrow_and_update();
                    controller.handle_viewport_height(height).await;
                }
                continue;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let mut parts = line.split_whitespace();
                let cmd = parts.next().unwrap_or("");
                let arg = parts.next().unwrap_or("");

                match cmd {
                    "" => {}
                    "q" | "quit" | "exit" => break,
                    "r" | "refresh" => controller.refresh().await,
                    "n" | "next" => {
                        let page = controller.state().current_page() + 1;
                        controller.handle_page_change(page).await;
                    }
                    "p" | "prev" => {
                        let page = controller.state().current_page().saturating_sub(1);
                        controller.handle_page_change(page).await;
                    }
                    "h" | "height" => match arg.parse::<u32>() {
                        Ok(rows) => tracker.resize(rows),
                        Err(_) => eprintln!("usage: h <rows>"),
                    },
                    "v" | "view" => {
                        let Some(id) = resolve_target(controller.state(), arg) else {
                            eprintln!("usage: v <row|id>");
                            continue;
                        };
                        if let Some(file) = controller.view_file(&id).await {
                            print_markdown(&file.markdown)?;
                        }
                    }
                    "d" | "delete" => {
                        let Some(id) = resolve_target(controller.state(), arg) else {
                            eprintln!("usage: d <row|id>");
                            continue;
                        };
                        eprint!("{MSG_CONFIRM_DELETE} [y/N] ");
                        let _ = io::stderr().flush();
                        let answer = lines.next_line().await.context("Failed to read stdin")?;
                        let yes = matches!(
                            answer.as_deref().map(|a| a.trim().to_lowercase()),
                            Some(a) if a == "y" || a == "yes"
                        );
                        controller.handle_delete_file(&id, &move |_: &str| yes).await;
                    }
                    page => match page.parse::<u32>() {
                        Ok(p) => {
                            controller.handle_page_change(p).await;
                        }
                        Err(_) => eprintln!("unknown command '{page}' (see --help)"),
                    },
                }
            }
        }
    }
    Ok(())
}
