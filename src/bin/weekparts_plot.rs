use log::{info, LevelFilter};
use std::process::ExitCode;
use weekparts::plot::{parse_cli, Input, PlotArgs};
use weekparts::parts::weekend_label;
use weekparts::{display, Category, Panel, Result, TimeStamps};

fn main() -> ExitCode {
    let args = parse_cli();
    configure_logging(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG is honoured unless --verbose asks for debug output
fn configure_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }
    builder.init();
}

fn run(args: &PlotArgs) -> Result<()> {
    let ts = match &args.input {
        Input::Csv(csvin) => {
            info!(
                "read data from {} and plot to {}",
                csvin.display(),
                args.svgout.display()
            );
            TimeStamps::from_csv(csvin, args.datecol.as_deref())?
        }
        Input::Synthetic => {
            info!("synthetic data, plot to {}", args.svgout.display());
            TimeStamps::synthetic()?
        }
    };
    if let Some((first, last)) = ts.span() {
        info!("{} timestamps from {} to {}", ts.len(), first, last);
    }

    let parts = ts.parts();
    print!("{}", parts);
    let split = parts.value_counts(Category::IsWeekend);
    info!(
        "{} weekday and {} weekend records",
        split.get(weekend_label(false)).unwrap_or(0),
        split.get(weekend_label(true)).unwrap_or(0)
    );

    let panels = Panel::defaults(args.category);
    if display(&parts, &panels, &args.svgout)? {
        info!("saved chart to {}", args.svgout.display());
    }
    Ok(())
}
