use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use prism_core::{
    read_text, DecodePolicy, EditorConfig, EditorSession, Launcher, SaveOutcome, ScriptedPrompt,
};
use prism_highlight::{HighlightSpan, SyntaxHighlighter};
use prism_project::{CreateOutcome, NodeKind};
use prism_settings::AppPaths;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prism-cli",
    about = "Command-line front-end for Prism Code Editor projects",
    author,
    version
)]
struct Cli {
    /// 存放 settings.json 與 projects.json 的資料夾；預設為目前目錄。 / Folder holding settings.json and projects.json (defaults to current directory).
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// 拒絕非 UTF-8 檔案，而非丟棄無效位元組。 / Refuse non-UTF-8 files instead of dropping invalid bytes.
    #[arg(long, global = true)]
    strict_decode: bool,

    /// 提高記錄詳細程度（可重複）。 / Increase log verbosity (repeatable).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 管理已儲存的專案。 / Manage saved projects.
    #[command(subcommand)]
    Projects(ProjectsCommand),
    /// 顯示或切換介面語言。 / Show or toggle the interface language.
    #[command(subcommand)]
    Language(LanguageCommand),
    /// 以目前語言列出啟動器標籤。 / Print launcher labels in the current language.
    Labels,
    /// 列出專案檔案樹。 / List a project's file tree.
    Tree(TreeArgs),
    /// 開啟檔案並輸出內容。 / Open a file in the project session and print it.
    Open(FileArgs),
    /// 以標準輸入取代緩衝區並儲存。 / Replace the buffer with stdin and save it.
    Save(FileArgs),
    /// 在專案根目錄建立空檔案。 / Create an empty file at the project root.
    Create(CreateArgs),
    /// 刪除檔案或空資料夾。 / Delete a file or an empty directory.
    Delete(DeleteArgs),
    /// 輸出每行的語法標示範圍。 / Print resolved highlight spans per line.
    Highlight(HighlightArgs),
}

#[derive(Subcommand)]
enum ProjectsCommand {
    /// 列出專案。 / List projects as `index  name  path`.
    List,
    /// 新增專案資料夾。 / Add a project folder.
    Add {
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,
    },
}

#[derive(Subcommand)]
enum LanguageCommand {
    Show,
    Toggle,
}

#[derive(Args)]
struct TreeArgs {
    /// 專案名稱或索引。 / Project name (first match) or zero-based index.
    #[arg(value_name = "PROJECT")]
    project: String,
    /// 展開所有資料夾。 / Expand every directory.
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
struct FileArgs {
    #[arg(value_name = "PROJECT")]
    project: String,
    /// 相對於專案根目錄的路徑。 / Path relative to the project root.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Args)]
struct CreateArgs {
    #[arg(value_name = "PROJECT")]
    project: String,
    /// 檔名（含副檔名）。 / File name including extension.
    #[arg(value_name = "NAME")]
    name: String,
}

#[derive(Args)]
struct DeleteArgs {
    #[arg(value_name = "PROJECT")]
    project: String,
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

#[derive(Args)]
struct HighlightArgs {
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// 以 JSON 輸出。 / Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        config_dir,
        strict_decode,
        verbose,
        command,
    } = Cli::parse();
    init_logging(verbose);

    let decode = if strict_decode {
        DecodePolicy::Strict
    } else {
        DecodePolicy::Lossy
    };
    match command {
        Commands::Highlight(args) => execute_highlight(args, decode),
        Commands::Projects(subcommand) => with_launcher(config_dir, decode, |launcher| {
            execute_projects(subcommand, launcher)
        }),
        Commands::Language(subcommand) => with_launcher(config_dir, decode, |launcher| {
            execute_language(subcommand, launcher)
        }),
        Commands::Labels => with_launcher(config_dir, decode, |launcher| {
            for (key, text) in launcher.labels() {
                println!("{key}\t{text}");
            }
            Ok(())
        }),
        Commands::Tree(args) => {
            with_launcher(config_dir, decode, |launcher| execute_tree(args, launcher))
        }
        Commands::Open(args) => {
            with_launcher(config_dir, decode, |launcher| execute_open(args, launcher))
        }
        Commands::Save(args) => {
            with_launcher(config_dir, decode, |launcher| execute_save(args, launcher))
        }
        Commands::Create(args) => {
            with_launcher(config_dir, decode, |launcher| execute_create(args, launcher))
        }
        Commands::Delete(args) => {
            with_launcher(config_dir, decode, |launcher| execute_delete(args, launcher))
        }
    }
}

/// 載入啟動器、執行動作後關閉所有工作階段。 / Loads the launcher, runs `action`, then shuts every session down.
fn with_launcher(
    config_dir: Option<PathBuf>,
    decode: DecodePolicy,
    action: impl FnOnce(&mut Launcher) -> Result<()>,
) -> Result<()> {
    let paths = resolve_paths(config_dir)?;
    let config = EditorConfig {
        decode,
        ..EditorConfig::default()
    };
    let mut launcher = Launcher::load(&paths, config).with_context(|| {
        format!(
            "failed to load configuration from {}",
            paths.settings_file.parent().unwrap_or(Path::new(".")).display()
        )
    })?;
    let result = action(&mut launcher);
    launcher.shutdown();
    result
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_paths(config_dir: Option<PathBuf>) -> Result<AppPaths> {
    match config_dir {
        Some(dir) => Ok(AppPaths::in_dir(dir)),
        None => AppPaths::current_dir().context("failed to determine current directory"),
    }
}

fn execute_projects(command: ProjectsCommand, launcher: &mut Launcher) -> Result<()> {
    match command {
        ProjectsCommand::List => {
            for (index, project) in launcher.projects().iter().enumerate() {
                println!("{index}  {}  {}", project.name, project.path.display());
            }
        }
        ProjectsCommand::Add { folder } => {
            let folder = absolutize(&folder)?;
            if !folder.is_dir() {
                bail!("{} is not a directory", folder.display());
            }
            let mut prompt = ScriptedPrompt::new().with_folder(folder);
            if let Some(index) = launcher.add_project(&mut prompt)? {
                let project = &launcher.projects()[index];
                println!("{index}  {}  {}", project.name, project.path.display());
            }
        }
    }
    Ok(())
}

fn execute_language(command: LanguageCommand, launcher: &mut Launcher) -> Result<()> {
    let language = match command {
        LanguageCommand::Show => launcher.language(),
        LanguageCommand::Toggle => launcher.toggle_language()?,
    };
    println!(
        "{language}  {}",
        launcher.localizer().text("launcher.language")
    );
    Ok(())
}

fn open_session<'a>(launcher: &'a mut Launcher, project: &str) -> Result<&'a mut EditorSession> {
    let index = launcher.resolve_project(project)?;
    debug!(project, index, "opening project session");
    Ok(launcher.open_project(index)?)
}

fn execute_tree(args: TreeArgs, launcher: &mut Launcher) -> Result<()> {
    let session = open_session(launcher, &args.project)?;
    let tree = session.tree_mut();
    if args.all {
        tree.expand_all()?;
    }
    for row in tree.visible_rows()? {
        let suffix = if row.node.kind == NodeKind::Directory {
            "/"
        } else {
            ""
        };
        println!("{}{}{}", "  ".repeat(row.depth), row.node.name, suffix);
    }
    Ok(())
}

fn execute_open(args: FileArgs, launcher: &mut Launcher) -> Result<()> {
    let session = open_session(launcher, &args.project)?;
    let text = session
        .open_file(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    print!("{text}");
    Ok(())
}

fn execute_save(args: FileArgs, launcher: &mut Launcher) -> Result<()> {
    let mut incoming = String::new();
    io::stdin()
        .read_to_string(&mut incoming)
        .context("failed to read buffer from stdin")?;

    let localizer = *launcher.localizer();
    let session = open_session(launcher, &args.project)?;
    session
        .open_file(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    session.set_buffer(incoming);

    let now = Instant::now();
    match session.save(now)? {
        SaveOutcome::Saved(path) => {
            let message = session.status(now).map(|key| localizer.text(key)).unwrap_or_default();
            println!("{message}: {}", path.display());
        }
        SaveOutcome::NothingOpen => bail!("no file is open"),
    }
    Ok(())
}

fn execute_create(args: CreateArgs, launcher: &mut Launcher) -> Result<()> {
    let localizer = *launcher.localizer();
    let session = open_session(launcher, &args.project)?;
    let mut prompt = ScriptedPrompt::new().with_text(args.name);
    match session.create_file(&mut prompt, &localizer)? {
        Some(CreateOutcome::Created(path)) => println!("created {}", path.display()),
        Some(CreateOutcome::AlreadyExists(path)) => println!("exists {}", path.display()),
        None => bail!("file name must not be empty"),
    }
    Ok(())
}

fn execute_delete(args: DeleteArgs, launcher: &mut Launcher) -> Result<()> {
    let session = open_session(launcher, &args.project)?;
    let outcome = session
        .delete(&args.path)
        .with_context(|| format!("failed to delete {}", args.path.display()))?;
    let kind = match outcome.kind {
        NodeKind::File => "file",
        NodeKind::Directory => "directory",
    };
    println!("deleted {kind} {}", args.path.display());
    Ok(())
}

fn execute_highlight(args: HighlightArgs, decode: DecodePolicy) -> Result<()> {
    let text = read_text(&args.file, decode)?;
    let highlighter = SyntaxHighlighter::python();
    let lines: Vec<(usize, &str, Vec<HighlightSpan>)> = text
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            (index + 1, line, highlighter.highlight_line(line))
        })
        .collect();

    if args.json {
        let spans: Vec<_> = lines
            .iter()
            .flat_map(|(number, line, spans)| {
                spans.iter().map(move |span| {
                    json!({
                        "line": number,
                        "start": span.start(),
                        "len": span.len(),
                        "kind": span.kind.name(),
                        "color": span.style.foreground.to_string(),
                        "bold": span.style.bold,
                        "italic": span.style.italic,
                        "text": &line[span.range.clone()],
                    })
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&spans)?);
        return Ok(());
    }

    for (number, line, spans) in &lines {
        for span in spans {
            println!(
                "{number}:{}-{} {} {} {:?}",
                span.range.start,
                span.range.end,
                span.kind.name(),
                span.style.foreground,
                &line[span.range.clone()]
            );
        }
    }
    Ok(())
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    Ok(cwd.join(path))
}
