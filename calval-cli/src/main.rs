//! Command line tool to produce altimetry SSH bias time series.
//! Refer to README for command line arguments.
//! Homepage: <https://github.com/ccarocean/altimetry-calval-timeseries>

mod averager; // overflight averaging collaborator
mod cli; // command line interface
mod plot;

use std::{path::PathBuf, process::ExitStatus};

use averager::Averager;
use cli::{Cli, Workspace};

use calval::{
    export,
    pipeline::{Dataset, Pipeline, Site},
    prelude::{load_catalina, load_harvest, Calibration},
};

use env_logger::{Builder, Target};

#[macro_use]
extern crate log;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    StdioError(#[from] std::io::Error),
    #[error("calval error")]
    CalvalError(#[from] calval::prelude::Error),
    #[error("plot error: {0}")]
    PlotError(String),
    #[error("failed to run \"{0}\"")]
    AveragerSpawn(PathBuf, #[source] std::io::Error),
    #[error("\"{0}\" terminated with {1}")]
    AveragerFailure(PathBuf, ExitStatus),
}

/*
 * Library errors are reported before terminating
 */
fn reported<T>(result: Result<T, calval::prelude::Error>) -> Result<T, Error> {
    result.map_err(|e| {
        error!("{}", e);
        Error::CalvalError(e)
    })
}

/*
 * Runs every product of the dataset site, plots and exports them.
 * The first failure aborts that site.
 */
fn produce<D: Dataset>(
    pipeline: &Pipeline<D>,
    site: Site,
    workspace: &Workspace,
    cli: &Cli,
) -> Result<(), Error> {
    workspace.create_products_dir(site)?;

    for product in site.products() {
        let series = reported(pipeline.run(product))?;
        debug!(
            "{}: {} inliers, {} outliers, b1={:.3} mm/yr",
            product,
            series.inliers.len(),
            series.outliers.len(),
            series.slope()
        );

        if let Some(path) = workspace.product_path(product, "png") {
            plot::plot_bias_series(&path, &series)?;
            info!("{} saved to \"{}\"", product.title(), path.display());
        }

        if cli.csv() {
            if let Some(path) = workspace.product_path(product, "csv") {
                export::to_path(&series, &path)?;
                info!("\"{}\" has been generated", path.display());
            }
        }
    }
    Ok(())
}

pub fn main() -> Result<(), Error> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let workspace = Workspace::new(&cli);
    let averager = Averager::new(&cli);
    let index = cli.lidar_index();
    let calibration = Calibration::default();

    info!("lidar index: {} ({})", index, index.description());

    if let Some(passes) = cli.harvest_passes() {
        if cli.load() {
            averager.run(passes, Site::Harvest, &workspace)?;
        }
        let data = reported(load_harvest(
            &workspace.overflights(Site::Harvest),
            passes,
            &workspace.wind_log(),
            index,
        ))?;
        info!("Harvest data loaded: {} overflights", data.len());

        let pipeline = Pipeline::new(&data, calibration);
        produce(&pipeline, Site::Harvest, &workspace, &cli)?;
    }

    if let Some(passes) = cli.catalina_passes() {
        if cli.load() {
            averager.run(passes, Site::Catalina, &workspace)?;
        }
        let data = reported(load_catalina(
            &workspace.overflights(Site::Catalina),
            passes,
            index,
        ))?;
        info!("Catalina data loaded: {} overflights", data.len());

        let pipeline =
            Pipeline::new(&data, calibration).with_backscatter_max(cli.backscatter_max());
        produce(&pipeline, Site::Catalina, &workspace, &cli)?;
    }

    Ok(())
}
