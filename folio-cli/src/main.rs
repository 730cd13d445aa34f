// Command-line interface for folio
//
// This binary renders markdown documents into themed, paginated PDFs (or the
// standalone HTML the PDF is printed from).
//
// All rendering lives in folio-core. This crate only reads flags and config,
// builds a pipeline and reports the outcome.
//
// Usage:
//  folio <inputs...> [-o <file>] [--theme <name>] [--to pdf|html]   - Render (default)
//  folio convert <inputs...> ...                                     - Same as above (explicit)
//  folio themes                                                      - List available themes
//  folio highlight-css [--theme <name>] [--list]                     - Print the token stylesheet
//
// Several inputs are merged, in the order given, into a single document.
//
// Configuration is layered: built-in defaults, then ./folio.toml if present, then the file
// named by --config, then command-line flags.
//
// Extra Parameters:
//
// Branding values can be passed using --extra-<key> <value>.
// The CLI layer strips the "extra-" prefix and applies them on top of the [branding] config.
// Example:
//  folio report.md --extra-client-name "Acme Corp" --extra-primary-color "#004488"

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use folio_config::{ConfigError, FolioConfig, Loader, OutputFormat, LOCAL_CONFIG};
use folio_core::highlight::Highlighter;
use folio_core::pipeline::{write_html, Assembled};
use folio_core::themes::ThemeRegistry;
use folio_core::{ChromeEngine, FolioError, Pipeline, SourceDocument, ThemeKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "themes", "highlight-css", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (no value, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with("--"));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render markdown into themed, paginated PDFs")
        .long_about(
            "folio turns markdown documents into print-ready PDFs with a cover page,\n\
            a table of contents, highlighted code and running headers/footers.\n\n\
            Commands:\n  \
            - convert:       Render one or more documents (default command)\n  \
            - themes:        List the available themes\n  \
            - highlight-css: Print the stylesheet used for code highlighting\n\n\
            Extra Parameters:\n  \
            Use --extra-<key> <value> to set branding: client-name, project-title,\n  \
            logo, primary-color, secondary-color, date.\n\n\
            Examples:\n  \
            folio report.md                                # Writes report.pdf\n  \
            folio report.md --theme technical -o out.pdf   # Pick a theme\n  \
            folio a.md b.md c.md -o handbook.pdf           # Merge in order\n  \
            folio report.md --to html                      # HTML to stdout",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a folio.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render markdown to PDF or HTML (default command)")
                .long_about(
                    "Render markdown documents with a theme.\n\n\
                    Multiple inputs are merged into one document in the order given;\n\
                    the first document's frontmatter wins on conflicts.\n\n\
                    PDF output defaults to the first input with a .pdf extension.\n\
                    HTML output goes to stdout unless -o is given.\n\n\
                    Examples:\n  \
                    folio convert report.md -o report.pdf\n  \
                    folio convert guide.md --theme technical --page-size letter\n  \
                    folio convert intro.md body.md --to html -o book.html",
                )
                .arg(
                    Arg::new("inputs")
                        .help("Markdown files to render")
                        .required(true)
                        .num_args(1..)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .short('t')
                        .help("Theme name (see `folio themes`)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Output format")
                        .value_parser(["pdf", "html"]),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .help("Paper size: A4, Letter or Legal")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("landscape")
                        .long("landscape")
                        .help("Print in landscape orientation")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-link-check")
                        .long("no-link-check")
                        .help("Skip validation of links and images")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the render report as JSON on stdout")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("themes").about("List the available themes"))
        .subcommand(
            Command::new("highlight-css")
                .about("Output the stylesheet used for highlighted code")
                .long_about(
                    "Outputs the token stylesheet injected into every rendered document.\n\n\
                    Examples:\n  \
                    folio highlight-css                       # Configured theme\n  \
                    folio highlight-css --theme base16-ocean.dark\n  \
                    folio highlight-css --list                # Bundled theme names",
                )
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .help("Highlighting theme name")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("list")
                        .long("list")
                        .help("List bundled highlighting themes")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);
    let matches = match_args(&cleaned_args);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let config = load_cli_config(&matches, Some(sub_matches), &extra_params);
            if let Err(err) = handle_convert_command(sub_matches, &config) {
                fail(&err.stage().to_string(), &err);
            }
        }
        Some(("themes", _)) => {
            let config = load_cli_config(&matches, None, &extra_params);
            handle_themes_command(&config);
        }
        Some(("highlight-css", sub_matches)) => {
            let config = load_cli_config(&matches, None, &extra_params);
            handle_highlight_css_command(sub_matches, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            process::exit(1);
        }
    }
}

/// Parse args, injecting "convert" when the first argument is not a subcommand.
fn match_args(args: &[String]) -> ArgMatches {
    let cli = build_cli();
    match cli.clone().try_get_matches_from(args) {
        Ok(m) => m,
        Err(e) => {
            if args.len() > 1
                && !args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    }
}

fn fail(stage: &str, message: &dyn std::fmt::Display) -> ! {
    eprintln!("error: {stage}: {message}");
    process::exit(1);
}

/// Defaults, then ./folio.toml, then --config, then flags and --extra-* values.
fn load_cli_config(
    matches: &ArgMatches,
    convert: Option<&ArgMatches>,
    extra_params: &HashMap<String, String>,
) -> FolioConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    let loader = match matches.get_one::<String>("config") {
        Some(path) => loader.with_file(path),
        None => loader,
    };
    let loader = match convert {
        Some(sub) => apply_flag_overrides(loader, sub).unwrap_or_else(|err| fail("config", &err)),
        None => loader,
    };
    let mut config = loader.build().unwrap_or_else(|err| fail("config", &err));

    for (key, value) in extra_params {
        if !config.branding.set(key, value) {
            fail(
                "config",
                &format!("unknown parameter --extra-{key} (expected a branding field)"),
            );
        }
    }
    config
}

fn apply_flag_overrides(mut loader: Loader, sub: &ArgMatches) -> Result<Loader, ConfigError> {
    if let Some(theme) = sub.get_one::<String>("theme") {
        loader = loader.set_override("render.theme", theme.as_str())?;
    }
    if let Some(to) = sub.get_one::<String>("to") {
        loader = loader.set_override("render.format", to.as_str())?;
    }
    if let Some(size) = sub.get_one::<String>("page-size") {
        loader = loader.set_override("pdf.page_size", size.as_str())?;
    }
    if sub.get_flag("landscape") {
        loader = loader.set_override("pdf.landscape", true)?;
    }
    if sub.get_flag("no-link-check") {
        loader = loader.set_override("parse.validate_links", false)?;
    }
    Ok(loader)
}

/// Handle the convert command
fn handle_convert_command(sub: &ArgMatches, config: &FolioConfig) -> Result<(), FolioError> {
    let inputs: Vec<&String> = sub
        .get_many::<String>("inputs")
        .map(|values| values.collect())
        .unwrap_or_default();
    let theme: ThemeKind = config.render.theme.parse()?;
    let pdf_options = config
        .pdf_options()
        .unwrap_or_else(|err| fail("config", &err));

    let sources = inputs
        .iter()
        .map(SourceDocument::from_path)
        .collect::<Result<Vec<_>, _>>()?;

    let mut pipeline = Pipeline::new(ChromeEngine::new())
        .with_parse_options(config.parse_options())
        .with_highlighter(config.highlight.highlighter())
        .with_pdf_options(pdf_options);

    let format = config.render.format;
    let output = sub.get_one::<String>("output").map(PathBuf::from);
    let json = sub.get_flag("json");

    match format {
        OutputFormat::Pdf => {
            let output = output.unwrap_or_else(|| default_output(inputs[0], format));
            let outcome = if sources.len() == 1 {
                pipeline.render(&sources[0], theme, &config.branding, &output)?
            } else {
                pipeline.merge_and_render(&sources, theme, &config.branding, &output)?
            };
            report_warnings(&outcome.warnings);
            if json {
                print_json(&outcome);
            } else {
                eprintln!(
                    "wrote {} ({} pages, {} bytes)",
                    outcome.artifact.output_path.display(),
                    outcome.artifact.page_count,
                    outcome.artifact.file_size_bytes
                );
            }
        }
        OutputFormat::Html => {
            let Assembled { document, content } = if sources.len() == 1 {
                pipeline.assemble(&sources[0], theme, &config.branding)?
            } else {
                pipeline.assemble_batch(&sources, theme, &config.branding)?
            };
            report_warnings(&content.warnings);
            match output {
                Some(path) => {
                    let written = write_html(&document, &path)?;
                    if json {
                        print_json(&serde_json::json!({
                            "output_path": written,
                            "toc": content.toc,
                            "metadata": content.metadata,
                            "warnings": content.warnings,
                            "estimated_pages": document.estimated_pages,
                        }));
                    }
                }
                None => print!("{}", document.html),
            }
        }
    }
    Ok(())
}

fn default_output(input: &str, format: OutputFormat) -> PathBuf {
    Path::new(input).with_extension(format.extension())
}

fn report_warnings(warnings: &[folio_core::ContentWarning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => fail("io", &err),
    }
}

/// Handle the themes command
fn handle_themes_command(config: &FolioConfig) {
    let registry = ThemeRegistry::with_defaults();
    println!("Available themes:\n");
    for (name, description) in registry.describe() {
        let marker = if name == config.render.theme { "*" } else { " " };
        println!(" {marker} {name:<14} {description}");
    }
}

/// Handle the highlight-css command
fn handle_highlight_css_command(sub: &ArgMatches, config: &FolioConfig) {
    if sub.get_flag("list") {
        let mut names = Highlighter::available_themes();
        names.sort();
        for name in names {
            println!("{name}");
        }
        return;
    }
    let name = sub
        .get_one::<String>("theme")
        .map(String::as_str)
        .unwrap_or(&config.highlight.theme);
    print!("{}", Highlighter::with_theme(name).stylesheet());
}
