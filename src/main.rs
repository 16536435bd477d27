/*!
 * doctrans binary entry point.
 *
 * Provides a clap CLI (text/document/excel/completions subcommands) and,
 * when started with no subcommand, the interactive numbered menu the tool
 * has always shipped with.
 */

use std::io::{self, BufRead, Write as IoWrite};
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record};

use doctrans::app_config::Config;
use doctrans::app_controller::Controller;

/// Simple colored stderr logger
struct CustomLogger;

static LOGGER: CustomLogger = CustomLogger;

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let (color, label) = match record.level() {
            Level::Error => ("\x1b[1;31m", "ERROR"),
            Level::Warn => ("\x1b[1;33m", "WARN "),
            Level::Info => ("\x1b[1;32m", "INFO "),
            Level::Debug => ("\x1b[1;34m", "DEBUG"),
            Level::Trace => ("\x1b[1;35m", "TRACE"),
        };
        eprintln!(
            "{}[{} {}]\x1b[0m {}",
            color,
            timestamp,
            label,
            record.args()
        );
    }

    fn flush(&self) {}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Bilingual Word/Excel document translation for SOP templates
#[derive(Parser)]
#[command(name = "doctrans", version, about)]
struct CommandLineOptions {
    /// Path to the configuration file
    #[arg(short, long, default_value = "conf.json")]
    config: PathBuf,

    /// Override the configured log level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a single piece of text into every target language
    Text {
        /// The text to translate
        text: String,
    },
    /// Translate every Word document in a directory
    Document {
        /// Directory containing .docx files
        input_dir: PathBuf,
    },
    /// Translate every Excel workbook in a directory
    Excel {
        /// Directory containing .xlsx files
        input_dir: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = options.command {
        let mut command = CommandLineOptions::command();
        generate(shell, &mut command, "doctrans", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load_or_create(&options.config)?;
    let level = options
        .log_level
        .map(LevelFilter::from)
        .unwrap_or_else(|| config.log_level.to_level_filter());
    log::set_logger(&LOGGER).ok();
    log::set_max_level(level);

    let controller = Controller::new(config)?;
    match options.command {
        Some(Commands::Text { text }) => controller.translate_text(&text).await?,
        Some(Commands::Document { input_dir }) => {
            controller.translate_document_folder(&input_dir).await?
        }
        Some(Commands::Excel { input_dir }) => {
            controller.translate_excel_folder(&input_dir).await?
        }
        Some(Commands::Completions { .. }) => unreachable!(),
        None => interactive_menu(&controller).await?,
    }
    Ok(())
}

/// The numbered console menu used on double-click starts
async fn interactive_menu(controller: &Controller) -> Result<()> {
    loop {
        println!();
        println!("===== 办公文档翻译工具 =====");
        println!("1. 文本翻译");
        println!("2. Word 文档翻译");
        println!("3. Excel 文档翻译");
        println!("4. 退出");
        let choice = prompt("请选择功能: ")?;
        match choice.trim() {
            "1" => {
                let text = prompt("请输入要翻译的文本: ")?;
                if text.trim().is_empty() {
                    continue;
                }
                controller.translate_text(text.trim()).await?;
            }
            "2" => {
                let dir = prompt("请输入 Word 文档所在目录: ")?;
                if let Err(e) = controller
                    .translate_document_folder(PathBuf::from(dir.trim()).as_path())
                    .await
                {
                    error!("{}", e);
                }
            }
            "3" => {
                let dir = prompt("请输入 Excel 文档所在目录: ")?;
                if let Err(e) = controller
                    .translate_excel_folder(PathBuf::from(dir.trim()).as_path())
                    .await
                {
                    error!("{}", e);
                }
            }
            "4" | "q" | "quit" | "exit" => {
                info!("bye");
                return Ok(());
            }
            other => println!("无效选项: {}", other),
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
