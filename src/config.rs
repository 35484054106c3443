use std::{fs, net::SocketAddr, path::Path};

use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub model: ModelConfig,
    pub affiliate: AffiliateConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// When this is None the page asks the visitor for a key instead.
    pub api_key: Option<String>,
    pub name: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AffiliateConfig {
    pub tag: String,
    pub search_url: String,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub site_name: String,
    pub seasonal_decorations: bool,
    pub show_version_info: bool,
}

// Everything is optional here so a user's config.toml only has to contain the
// fields it wants to change. config-base.toml fills in the rest.
#[derive(Deserialize, Debug, Default)]
struct PartialConfig {
    bind: Option<SocketAddr>,
    #[serde(default)]
    model: PartialModelConfig,
    #[serde(default)]
    affiliate: PartialAffiliateConfig,
    #[serde(default)]
    ui: PartialUiConfig,
}

#[derive(Deserialize, Debug, Default)]
struct PartialModelConfig {
    api_key: Option<String>,
    name: Option<String>,
    api_base: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct PartialAffiliateConfig {
    tag: Option<String>,
    search_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct PartialUiConfig {
    site_name: Option<String>,
    seasonal_decorations: Option<bool>,
    show_version_info: Option<bool>,
}

impl Config {
    pub fn read_or_create(config_path: &Path) -> eyre::Result<Self> {
        let base_config_str = include_str!("../config-base.toml");
        let mut config: PartialConfig = toml::from_str(base_config_str)?;

        if !config_path.exists() {
            info!("No config found, creating one at {config_path:?}");
            let default_config_str = include_str!("../config-default.toml");
            fs::write(config_path, default_config_str)?;
        }

        let given_config = toml::from_str::<PartialConfig>(&fs::read_to_string(config_path)?)?;
        config.update(given_config);
        config.apply_env(|key| std::env::var(key).ok());

        let config = config.resolve()?;
        if config.affiliate.tag.is_empty() {
            warn!("affiliate.tag is empty, outbound links won't be attributed to anyone");
        }
        Ok(config)
    }

    /// Parse a config from a TOML string, layered over config-base.toml. No
    /// environment variables are consulted.
    pub fn from_toml(s: &str) -> eyre::Result<Self> {
        let mut config: PartialConfig = toml::from_str(include_str!("../config-base.toml"))?;
        config.update(toml::from_str(s)?);
        config.resolve()
    }
}

impl PartialConfig {
    fn update(&mut self, new: PartialConfig) {
        self.bind = new.bind.or(self.bind);

        self.model.api_key = new.model.api_key.or(self.model.api_key.take());
        self.model.name = new.model.name.or(self.model.name.take());
        self.model.api_base = new.model.api_base.or(self.model.api_base.take());

        self.affiliate.tag = new.affiliate.tag.or(self.affiliate.tag.take());
        self.affiliate.search_url = new.affiliate.search_url.or(self.affiliate.search_url.take());

        self.ui.site_name = new.ui.site_name.or(self.ui.site_name.take());
        self.ui.seasonal_decorations = new
            .ui
            .seasonal_decorations
            .or(self.ui.seasonal_decorations);
        self.ui.show_version_info = new.ui.show_version_info.or(self.ui.show_version_info);
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(api_key) = non_blank("GOOGLE_API_KEY") {
            self.model.api_key = Some(api_key);
        }
        if let Some(tag) = non_blank("AMAZON_AFFILIATE_TAG") {
            self.affiliate.tag = Some(tag);
        }
    }

    fn resolve(self) -> eyre::Result<Config> {
        fn required<T>(value: Option<T>, name: &str) -> eyre::Result<T> {
            value.ok_or_else(|| eyre::eyre!("missing config value `{name}`"))
        }

        Ok(Config {
            bind: required(self.bind, "bind")?,
            model: ModelConfig {
                api_key: self
                    .model
                    .api_key
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty()),
                name: required(self.model.name, "model.name")?,
                api_base: required(self.model.api_base, "model.api_base")?
                    .trim_end_matches('/')
                    .to_string(),
            },
            affiliate: AffiliateConfig {
                tag: required(self.affiliate.tag, "affiliate.tag")?
                    .trim()
                    .to_string(),
                search_url: required(self.affiliate.search_url, "affiliate.search_url")?,
            },
            ui: UiConfig {
                site_name: required(self.ui.site_name, "ui.site_name")?,
                seasonal_decorations: required(
                    self.ui.seasonal_decorations,
                    "ui.seasonal_decorations",
                )?,
                show_version_info: required(self.ui.show_version_info, "ui.show_version_info")?,
            },
        })
    }
}
