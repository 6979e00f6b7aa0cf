//! External overflight averaging program
use std::{
    path::{Path, PathBuf},
    process::Command,
};

use calval::pipeline::Site;

use crate::{
    cli::{Cli, Workspace},
    Error,
};

/// Program used when nothing else is specified
const DEFAULT_PROGRAM: &str = "ovavg";

/// Produces the overflight CSV of a site from raw LiDAR archives
pub struct Averager {
    pub program: PathBuf,
}

impl Averager {
    /// Program is picked up from
    ///  1. $CALVAL_AVERAGER environment variable
    ///  2. --averager CLI argument
    ///  3. defaults to "ovavg" in $PATH
    pub fn new(cli: &Cli) -> Self {
        let program = match std::env::var("CALVAL_AVERAGER") {
            Ok(program) => PathBuf::from(program),
            _ => match cli.averager() {
                Some(program) => program.to_path_buf(),
                None => PathBuf::from(DEFAULT_PROGRAM),
            },
        };
        Self { program }
    }

    fn command(&self, satellite: &Path, site: Site, workspace: &Workspace) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(satellite)
            .arg(site.short_name())
            .arg(workspace.six_minute_dir(site))
            .arg(workspace.raw_dir(site))
            .arg(workspace.overflights(site));
        cmd
    }

    /// Runs the averaging program for given site, waiting for completion.
    /// Any failure is fatal.
    pub fn run(&self, satellite: &Path, site: Site, workspace: &Workspace) -> Result<(), Error> {
        info!("reading overflight data from \"{}\"", satellite.display());

        let status = self
            .command(satellite, site, workspace)
            .status()
            .map_err(|e| Error::AveragerSpawn(self.program.clone(), e))?;

        if !status.success() {
            return Err(Error::AveragerFailure(self.program.clone(), status));
        }

        info!(
            "overflight data written to \"{}\"",
            workspace.overflights(site).display()
        );
        Ok(())
    }
}
