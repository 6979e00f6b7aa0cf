use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};

use calval::{lidar::LidarIndex, pipeline::DEFAULT_BACKSCATTER_MAX};

mod workspace;
pub use workspace::Workspace;

pub struct Cli {
    /// Arguments passed by user
    pub matches: ArgMatches,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    fn command() -> Command {
        Command::new("calval-cli")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Altimetry SSH bias time series")
            .long_about("calval-cli produces the Jason 3 SSH bias time series
of the Harvest platform and of the Catalina / LA tide gauge sites.
Each product is rendered as a PNG plot, with 3 sigma outliers
and linear trend.")
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .next_help_heading("Sites")
            .arg(Arg::new("harv")
                .long("harv")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present("cata")
                .help("Create Harvest time series. Argument is the satellite pass file."))
            .arg(Arg::new("cata")
                .long("cata")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present("harv")
                .help("Create Catalina time series. Argument is the satellite pass file."))
            .next_help_heading("LiDAR data")
            .arg(Arg::new("lidarindex")
                .short('i')
                .long("lidarindex")
                .value_name("INDEX")
                .value_parser(LidarIndex::from_str)
                .default_value("l_6m_quad2h")
                .help("LiDAR statistic to use. See --help for more information.")
                .long_help("LiDAR statistic to use for the time series.
l_6m_quad2h is a 4 hour quadratic regression on the 6 minute data (default).
l_mean is an average of 2200 seconds of data around the overflight.
l_lin1100 is a linear regression of 2200 seconds of data around the overflight.
l_quad2h is a quadratic regression of 4 hours of data around the overflight."))
            .arg(Arg::new("load")
                .short('l')
                .long("load")
                .action(ArgAction::SetTrue)
                .help("Loads and averages LiDAR data first. Use this when new overflight data is available."))
            .arg(Arg::new("averager")
                .long("averager")
                .value_name("PROGRAM")
                .value_parser(value_parser!(PathBuf))
                .help("Overflight averaging program, used by --load.
The $CALVAL_AVERAGER variable is always prefered."))
            .next_help_heading("Processing")
            .arg(Arg::new("bs-max")
                .long("bs-max")
                .value_name("BACKSCATTER")
                .value_parser(value_parser!(f64))
                .help("Backscatter quality threshold (Catalina).
Only passes with backscatter strictly below this value are retained."))
            .next_help_heading("Output")
            .arg(Arg::new("workspace")
                .short('w')
                .long("workspace")
                .value_name("FOLDER")
                .value_parser(value_parser!(PathBuf))
                .help("Define custom data root. See --help for more information.")
                .long_help("Data root, where site data is read from and products are generated.
The $CALVAL_WORKSPACE variable is automatically picked up by this application and always prefered.
Use --workspace,-w to define it at runtime if you prefer.
Defaults to /srv/data/harvest."))
            .arg(Arg::new("csv")
                .long("csv")
                .action(ArgAction::SetTrue)
                .help("Also export each product as CSV, next to its plot."))
    }
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }
    /// Build command line interface from given arguments
    pub fn try_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self {
            matches: Self::command().try_get_matches_from(args)?,
        })
    }
    /// Harvest satellite pass file
    pub fn harvest_passes(&self) -> Option<&Path> {
        self.matches.get_one::<PathBuf>("harv").map(|p| p.as_path())
    }
    /// Catalina satellite pass file
    pub fn catalina_passes(&self) -> Option<&Path> {
        self.matches.get_one::<PathBuf>("cata").map(|p| p.as_path())
    }
    /// Selected LiDAR statistic
    pub fn lidar_index(&self) -> LidarIndex {
        self.matches
            .get_one::<LidarIndex>("lidarindex")
            .copied()
            .unwrap_or_default()
    }
    /// True if overflight averaging is requested
    pub fn load(&self) -> bool {
        self.matches.get_flag("load")
    }
    pub fn averager(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("averager")
    }
    /// Backscatter quality threshold
    pub fn backscatter_max(&self) -> f64 {
        self.matches
            .get_one::<f64>("bs-max")
            .copied()
            .unwrap_or(DEFAULT_BACKSCATTER_MAX)
    }
    pub fn workspace(&self) -> Option<&PathBuf> {
        self.matches.get_one::<PathBuf>("workspace")
    }
    /// True if CSV export is requested
    pub fn csv(&self) -> bool {
        self.matches.get_flag("csv")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn site_selection() {
        let cli = Cli::try_from_iter(["calval-cli", "--harv", "harv.txt"]).unwrap();
        assert_eq!(cli.harvest_passes(), Some(Path::new("harv.txt")));
        assert_eq!(cli.catalina_passes(), None);
        assert_eq!(cli.lidar_index(), LidarIndex::SixMinuteQuad2h);
        assert_eq!(cli.backscatter_max(), 15.0);
        assert!(!cli.load());
        assert!(!cli.csv());

        let cli = Cli::try_from_iter([
            "calval-cli",
            "--cata",
            "cata.txt",
            "--harv",
            "harv.txt",
            "-i",
            "l_lin1100",
            "--bs-max",
            "12.5",
            "-l",
            "--csv",
        ])
        .unwrap();
        assert_eq!(cli.catalina_passes(), Some(Path::new("cata.txt")));
        assert_eq!(cli.lidar_index(), LidarIndex::Linear1100);
        assert_eq!(cli.backscatter_max(), 12.5);
        assert!(cli.load());
        assert!(cli.csv());
    }
    #[test]
    fn configuration_errors() {
        // at least one site
        assert!(Cli::try_from_iter(["calval-cli", "-i", "l_mean"]).is_err());
        // closed set of lidar statistics
        assert!(Cli::try_from_iter(["calval-cli", "--harv", "harv.txt", "-i", "l_median"]).is_err());
        assert!(Cli::try_from_iter(["calval-cli", "--cata", "cata.txt", "--bs-max", "high"]).is_err());
    }
}
