use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the theme names from folio-core's ThemeKind
// We need to duplicate this here since build scripts can't access the library
const AVAILABLE_THEMES: &[&str] = &["professional", "technical", "executive"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render markdown into themed, paginated PDFs")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render markdown to PDF or HTML (default command)")
                .arg(
                    Arg::new("inputs")
                        .required(true)
                        .num_args(1..)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .short('t')
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_THEMES)),
                )
                .arg(Arg::new("to").long("to").value_parser(["pdf", "html"]))
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .value_parser(["A4", "Letter", "Legal"]),
                )
                .arg(Arg::new("landscape").long("landscape").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("no-link-check")
                        .long("no-link-check")
                        .action(ArgAction::SetTrue),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("themes").about("List the available themes"))
        .subcommand(
            Command::new("highlight-css")
                .about("Output the stylesheet used for highlighted code")
                .arg(Arg::new("theme").long("theme"))
                .arg(Arg::new("list").long("list").action(ArgAction::SetTrue)),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "folio", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "folio", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "folio", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
