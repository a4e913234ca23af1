use super::VERSION;
use crate::parts::Category;
use clap::{App, Arg, ArgGroup, ArgMatches};
use std::path::PathBuf;

/// Where the timestamps come from
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Csv(PathBuf),
    Synthetic,
}

/// The resolved CLI arguments of the plotting app
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArgs {
    pub input: Input,
    pub svgout: PathBuf,
    pub datecol: Option<String>,
    pub category: Category,
    pub verbose: bool,
}

fn app<'a, 'b>() -> App<'a, 'b> {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the csv file with the date column")
        .short("f")
        .long("csvfile")
        .takes_value(true);
    let arg_synthetic = Arg::with_name("example_synthetic")
        .help("use a synthetic periodic series instead of a csv file")
        .long("example_synthetic")
        .takes_value(false);
    let arg_datecol = Arg::with_name("datecol")
        .help("name of the date column")
        .long_help(
            "name of the date column; \
            if not given, the only column or the one named timestamp is used",
        )
        .short("d")
        .long("datecol")
        .takes_value(true);
    let arg_category = Arg::with_name("category")
        .help("derived attribute to count and plot")
        .short("c")
        .long("category")
        .takes_value(true)
        .possible_values(&Category::NAMES)
        .default_value("is_weekend");
    let arg_svgout = Arg::with_name("output_svgfile")
        .help("name of the output svg file")
        .short("o")
        .long("svgfile")
        .takes_value(true);
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);
    App::new("weekparts_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot the weekend/weekday distribution of a timestamp series")
        .arg(arg_csvin)
        .arg(arg_synthetic)
        .group(
            ArgGroup::with_name("input")
                .args(&["input_csvfile", "example_synthetic"])
                .required(true),
        )
        .arg(arg_datecol)
        .arg(arg_category)
        .arg(arg_svgout)
        .arg(arg_verbose)
}

/// Takes the CLI arguments that control the extraction and the plotting.
/// Exits with clap's message on invalid arguments, --help or --version.
pub fn parse_cli() -> PlotArgs {
    parse_cli_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

/// same as parse_cli, on the given arguments
pub fn parse_cli_from<I, T>(args: I) -> clap::Result<PlotArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(resolve(&app().get_matches_from_safe(args)?))
}

fn resolve(cli_args: &ArgMatches) -> PlotArgs {
    let input = match cli_args.value_of("input_csvfile") {
        Some(p) => Input::Csv(PathBuf::from(p)),
        None => Input::Synthetic,
    };
    let svgout = match cli_args.value_of("output_svgfile") {
        Some(p) => PathBuf::from(p),
        None => match &input {
            Input::Csv(csvin) => {
                let mut svgout = csvin.clone();
                svgout.set_extension("svg");
                svgout
            }
            Input::Synthetic => PathBuf::from("synthetic.svg"),
        },
    };
    // possible_values keeps this to the known names
    let category = cli_args
        .value_of("category")
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or_default();
    PlotArgs {
        input,
        svgout,
        datecol: cli_args.value_of("datecol").map(String::from),
        category,
        verbose: cli_args.is_present("verbose"),
    }
}
