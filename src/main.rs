use anyhow::{Context, Result};
use clap::Parser;

use nearby_exoplanets::cli::Cli;
use nearby_exoplanets::data::archive;
use nearby_exoplanets::figure::output;
use nearby_exoplanets::{app, attach_target_list, load_catalog, make_figure};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.filter_options();
    options.validate()?;

    if cli.refresh {
        // The cache holds the whole table; bounds are applied locally.
        archive::refresh(&cli.data)
            .with_context(|| format!("refreshing {}", cli.data.display()))?;
    }

    let mut catalog = load_catalog(&cli.data)?;
    if let Some(list) = cli.target_list_path() {
        attach_target_list(&mut catalog, options.target_list, list);
    }

    if cli.show {
        return app::run_viewer(catalog, Some(cli.data.clone()), options, cli.into());
    }

    let figure = make_figure(&catalog, &options)?;
    if figure.is_empty() {
        log::warn!("No planets pass the given bounds; writing an empty figure");
    }
    output::save(&figure, &cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    Ok(())
}
