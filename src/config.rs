use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use llll_wiki_scraping_utils::fs_util::read_toml;
use log::info;
use serde::{Deserialize, Serialize};

use crate::link::{member_page_url, DEFAULT_MEMBER, SCHOOL_PAGE_URL, WIKI_ROOT};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub member: String,
    pub school_page_url: String,
    pub wiki_root: String,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub fetch_delay_millis: u64,
    pub probe_delay_millis: u64,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            member: DEFAULT_MEMBER.to_owned(),
            school_page_url: SCHOOL_PAGE_URL.to_owned(),
            wiki_root: WIKI_ROOT.to_owned(),
            user_agent: USER_AGENT.to_owned(),
            fetch_timeout_secs: 30,
            probe_timeout_secs: 10,
            fetch_delay_millis: 1000,
            probe_delay_millis: 500,
            output_dir: "data".into(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = read_toml(path)?;
        info!("Loaded config from {path:?}");
        Ok(config)
    }

    pub fn member_page_url(&self) -> String {
        member_page_url(&self.school_page_url, &self.member)
    }

    /// Listing stage output, which is also the detail stage input.
    pub fn card_list_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("card_link_{}.csv", self.member))
    }

    pub fn voices_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("card_link_with_voices_{}.csv", self.member))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_millis)
    }

    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_millis)
    }
}

/// Command line options shared by the binaries.  Flags override the config file.
#[derive(Clone, Debug, clap::Args)]
pub struct ConfigArgs {
    /// TOML file with any of the `Config` fields.
    #[clap(long)]
    pub config: Option<PathBuf>,
    #[clap(long)]
    pub member: Option<String>,
    #[clap(long)]
    pub output_dir: Option<PathBuf>,
    /// Delay between two consecutive requests, in milliseconds.
    #[clap(long)]
    pub delay_millis: Option<u64>,
}

impl ConfigArgs {
    pub fn load(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(member) = &self.member {
            config.member.clone_from(member);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(delay) = self.delay_millis {
            config.fetch_delay_millis = delay;
            config.probe_delay_millis = delay;
        }
    }
}
