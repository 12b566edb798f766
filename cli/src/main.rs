//! rtfmark CLI - markup to RTF conversion and RTF formatting tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use rtfmark::convert::expand_path;
use rtfmark::{
    apply_formatting, create_document_with_options, create_documents, parse_rtf_file,
    ConvertOptions, CreateRequest, DocumentStats, FormatOperation, JsonFormat, ParseOptions,
    Template,
};

#[derive(Parser)]
#[command(name = "rtfmark")]
#[command(version)]
#[command(about = "Create RTF documents from markup and re-format existing ones", long_about = None)]
struct Cli {
    /// Input markup file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output RTF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Document template
    #[arg(short, long, value_enum, default_value = "business")]
    template: TemplateName,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an RTF document from markup
    Create {
        /// Input markup file ("-" reads stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output RTF file (defaults to the input name with .rtf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document template
        #[arg(short, long, value_enum, default_value = "business")]
        template: TemplateName,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Document author
        #[arg(long)]
        author: Option<String>,

        /// Treat pipe lines as plain paragraphs
        #[arg(long)]
        no_tables: bool,
    },

    /// Apply formatting operations to an existing RTF file
    Format {
        /// RTF file to edit in place
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Operations as a JSON array, e.g. '[{"type":"bold","start":0,"length":5}]'
        #[arg(long, value_name = "JSON", conflicts_with = "ops_file")]
        ops: Option<String>,

        /// File holding the operations JSON array
        #[arg(long, value_name = "FILE")]
        ops_file: Option<PathBuf>,
    },

    /// Create many documents from a JSON list of requests
    Batch {
        /// JSON file: [{"content": "...", "output_path": "...", "template": "..."}]
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the editable text of an RTF file
    Text {
        /// Input RTF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Show byte offsets for each line
        #[arg(long)]
        offsets: bool,
    },

    /// Dump the document model of an RTF file as JSON
    Json {
        /// Input RTF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input RTF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List available templates
    Templates,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TemplateName {
    /// Sans-serif, 12pt
    Business,
    /// Monospace, 11pt, dark gray text
    Technical,
    /// Sans-serif, 11pt, airy line spacing
    Meeting,
    /// Business look, reserved for user styles
    Custom,
}

impl From<TemplateName> for Template {
    fn from(name: TemplateName) -> Self {
        match name {
            TemplateName::Business => Template::Business,
            TemplateName::Technical => Template::Technical,
            TemplateName::Meeting => Template::Meeting,
            TemplateName::Custom => Template::Custom,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Create {
            input,
            output,
            template,
            title,
            author,
            no_tables,
        }) => {
            let mut parse = ParseOptions::new().with_template(template.into());
            if let Some(title) = title {
                parse = parse.with_title(title);
            }
            if let Some(author) = author {
                parse = parse.with_author(author);
            }
            if no_tables {
                parse = parse.without_tables();
            }
            cmd_create(&input, output.as_deref(), parse)
        }
        Some(Commands::Format {
            input,
            ops,
            ops_file,
        }) => cmd_format(&input, ops.as_deref(), ops_file.as_deref()),
        Some(Commands::Batch { input }) => cmd_batch(&input),
        Some(Commands::Text {
            input,
            output,
            offsets,
        }) => cmd_text(&input, output.as_deref(), offsets),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Templates) => {
            cmd_templates();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: create if input is provided
            if let Some(input) = cli.input {
                let parse = ParseOptions::new().with_template(cli.template.into());
                cmd_create(&input, cli.output.as_deref(), parse)
            } else {
                println!("{}", "Usage: rtfmark <FILE> [OUTPUT]".yellow());
                println!("       rtfmark --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(expand_path(&input.to_string_lossy()))?)
    }
}

fn default_output(input: &Path) -> PathBuf {
    if input.as_os_str() == "-" {
        PathBuf::from("output.rtf")
    } else {
        input.with_extension("rtf")
    }
}

fn cmd_create(input: &Path, output: Option<&Path>, parse: ParseOptions) -> CliResult {
    let markup = read_input(input)?;
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));

    let options = ConvertOptions::new().with_parse_options(parse);
    let result = create_document_with_options(&markup, &output.to_string_lossy(), &options);
    if !result.success {
        return Err(result.message.into());
    }

    println!("{} {}", "Saved to".green(), result.path);
    Ok(())
}

fn cmd_format(input: &Path, ops: Option<&str>, ops_file: Option<&Path>) -> CliResult {
    let json = match (ops, ops_file) {
        (Some(json), _) => json.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => return Err("one of --ops or --ops-file is required".into()),
    };
    let operations: Vec<FormatOperation> =
        serde_json::from_str(&json).map_err(|e| format!("Invalid operations: {}", e))?;
    log::debug!("Applying {} operations to {}", operations.len(), input.display());

    let result = apply_formatting(&input.to_string_lossy(), &operations);
    if !result.success {
        return Err(result.message.into());
    }

    let status = if result.skipped == 0 {
        "Done!".green().bold()
    } else {
        "Done with warnings:".yellow().bold()
    };
    println!("{} {}", status, result.message);
    Ok(())
}

fn cmd_batch(input: &Path) -> CliResult {
    let json = fs::read_to_string(input)?;
    let requests: Vec<CreateRequest> =
        serde_json::from_str(&json).map_err(|e| format!("Invalid requests: {}", e))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Creating {} documents...", requests.len()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let results = create_documents(&requests);
    pb.finish_and_clear();

    let mut failed = 0;
    for (request, result) in requests.iter().zip(&results) {
        if result.success {
            println!("  {} {}", "├─".dimmed(), result.path);
        } else {
            failed += 1;
            println!(
                "  {} {} {}",
                "├─".dimmed(),
                request.output_path.red(),
                result.message.dimmed()
            );
        }
    }

    println!(
        "\n{} {} created, {} failed",
        "Done!".green().bold(),
        results.len() - failed,
        failed
    );
    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, results.len()).into());
    }
    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>, offsets: bool) -> CliResult {
    let doc = parse_rtf_file(expand_path(&input.to_string_lossy()))?;
    let text = doc.text();

    let text = if offsets {
        let mut annotated = String::new();
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            annotated.push_str(&format!("{:>6}  {}", offset, line));
            offset += line.len();
        }
        annotated
    } else {
        text
    };

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let doc = parse_rtf_file(expand_path(&input.to_string_lossy()))?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = rtfmark::render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let path = expand_path(&input.to_string_lossy());
    let format = rtfmark::detect_format_from_path(&path)?;
    let doc = parse_rtf_file(&path)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), path.display());
    println!("{}: {}", "Format".bold(), format);

    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = DocumentStats::from_blocks(&doc.blocks);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Links".bold(), stats.link_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    println!("{}: {}", "Text length".bold(), doc.text_len());

    Ok(())
}

fn cmd_templates() {
    println!("{}", "Templates".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for template in Template::all() {
        let style = template.style();
        println!(
            "  {:<10} {} {}pt, line spacing {}",
            template.name().bold(),
            style.base.font_family.base_name(),
            style.base.font_size,
            style.line_spacing
        );
    }
}

fn cmd_version() {
    println!("{} {}", "rtfmark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markup to RTF conversion tool");
    println!();
    println!("License: MIT");
}
