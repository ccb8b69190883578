//! In-memory source for embedded data and tests

use crate::{DataSource, LoadResult};

pub struct StaticSource {
    name: String,
    text: String,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[async_trait::async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> LoadResult<String> {
        Ok(self.text.clone())
    }
}
