use std::path::{Path, PathBuf};

use fnt_client::Tiddler;
use serde::Deserialize;

use crate::error::FntToolError;

/// Where tiddlers live: the host plus a bag or recipe.
///
/// The same shape is read from CLI flags, `FNT_*` environment variables and
/// `~/.config/fnt/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Addressing {
    pub host: Option<String>,
    pub bag: Option<String>,
    pub recipe: Option<String>,
}

impl Addressing {
    pub fn from_env() -> Self {
        Self {
            host: env_var("FNT_HOST"),
            bag: env_var("FNT_BAG"),
            recipe: env_var("FNT_RECIPE"),
        }
    }

    fn has_container(&self) -> bool {
        self.bag.is_some() || self.recipe.is_some()
    }

    /// Layers `self` over `fallback`. The container is taken as a unit so a
    /// recipe given here is not shadowed by a bag from further down.
    pub fn or(self, fallback: Addressing) -> Addressing {
        let (bag, recipe) = if self.has_container() {
            (self.bag, self.recipe)
        } else {
            (fallback.bag, fallback.recipe)
        };
        Addressing {
            host: self.host.or(fallback.host),
            bag,
            recipe,
        }
    }

    /// Builds an addressed tiddler. Missing pieces surface later as a
    /// configuration error from the client.
    pub fn tiddler(&self, title: &str) -> Tiddler {
        let mut tiddler = Tiddler::new(title);
        if let Some(host) = &self.host {
            tiddler.set_host(host.as_str());
        }
        if let Some(bag) = &self.bag {
            tiddler.set_bag(bag.as_str());
        }
        if let Some(recipe) = &self.recipe {
            tiddler.set_recipe(recipe.as_str());
        }
        tiddler
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fnt").join("config.toml"))
}

/// Reads addressing from a config file. A missing file is an empty config.
pub fn load_config_from(path: &Path) -> Result<Addressing, FntToolError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Addressing::default()),
        Err(e) => return Err(e.into()),
    };

    toml::from_str(&content).map_err(|source| FntToolError::Config {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config() -> Result<Addressing, FntToolError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Addressing::default()),
    }
}

/// CLI flags win over the environment, which wins over the config file.
pub fn resolve_addressing(cli: Addressing) -> Result<Addressing, FntToolError> {
    Ok(cli.or(Addressing::from_env()).or(load_config()?))
}
