use crate::error::ConfigurationError;
use crate::types::{Container, Tiddler};

impl Tiddler {
    /// Absolute resource URI: `<host>/{bags|recipes}/<name>/tiddlers/<title>`.
    ///
    /// Container name and title are percent-encoded; the host is used as given,
    /// minus any trailing slash.
    pub fn uri(&self) -> Result<String, ConfigurationError> {
        let host = self.host().ok_or(ConfigurationError::HostRequired)?;
        let container = match self.container() {
            Some(Container::Bag(bag)) => format!("bags/{}", urlencoding::encode(bag)),
            Some(Container::Recipe(recipe)) => {
                format!("recipes/{}", urlencoding::encode(recipe))
            }
            None => return Err(ConfigurationError::NoContainer),
        };

        Ok(format!(
            "{}/{}/tiddlers/{}",
            host.trim_end_matches('/'),
            container,
            urlencoding::encode(self.title())
        ))
    }
}
