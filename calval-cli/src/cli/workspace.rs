//! Workspace definition and helper
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use calval::pipeline::{Product, Site};

use crate::{cli::Cli, Error};

/// Default data root
const DEFAULT_ROOT: &str = "/srv/data/harvest";

/// Workspace: site data inputs and generated products
pub struct Workspace {
    /// Root Fullpath
    pub root: PathBuf,
}

impl Workspace {
    /// Builds a new workspace either
    ///  1. from $CALVAL_WORKSPACE environment variable
    ///  2. from -w workspace CLI argument
    ///  3. or defaults to /srv/data/harvest
    pub fn new(cli: &Cli) -> Self {
        let root = match std::env::var("CALVAL_WORKSPACE") {
            Ok(path) => PathBuf::from(path),
            _ => match cli.workspace() {
                Some(path) => path.to_path_buf(),
                None => PathBuf::from(DEFAULT_ROOT),
            },
        };
        info!("workspace is \"{}\"", root.display());
        Self::from_root(root)
    }
    /// Builds a workspace on given root
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    /// Site data directory
    pub fn site_dir(&self, site: Site) -> PathBuf {
        self.root.join(site.short_name())
    }
    /// Overflight CSV of given site
    pub fn overflights(&self, site: Site) -> PathBuf {
        self.site_dir(site).join("lidardata_overflights.csv")
    }
    /// Wind station log (Harvest)
    pub fn wind_log(&self) -> PathBuf {
        self.site_dir(Site::Harvest).join("co-ops").join("wind.txt")
    }
    /// Raw LiDAR archives of given site
    pub fn raw_dir(&self, site: Site) -> PathBuf {
        self.site_dir(site).join("uls")
    }
    /// 6 minute LiDAR data of given site
    pub fn six_minute_dir(&self, site: Site) -> PathBuf {
        self.site_dir(site).join("six_minute")
    }
    /// Products directory of given site
    pub fn products_dir(&self, site: Site) -> PathBuf {
        self.root.join("timeseries").join(site.short_name())
    }
    /// Output path of given product, with given extension
    pub fn product_path(&self, product: &Product, extension: &str) -> Option<PathBuf> {
        let stem = product.file_stem()?;
        Some(
            self.products_dir(product.site)
                .join(format!("{}.{}", stem, extension)),
        )
    }
    /// Makes sure the products directory of given site exists
    pub fn create_products_dir(&self, site: Site) -> Result<(), Error> {
        let dir = self.products_dir(site);
        create_dir_all(&dir)?;
        debug!("created \"{}\"", dir.display());
        Ok(())
    }
}
