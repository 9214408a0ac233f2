use anyhow::Result;

use crate::domain::MediaResult;

use super::super::Container;

pub struct QueryController<'a> {
    container: &'a Container,
}

impl<'a> QueryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn query(&self, text: String, pretty: bool) -> Result<String> {
        let use_case = self.container.handle_query_use_case();
        let result = use_case.execute(Some(text.as_str())).await?;

        self.format_result(&result, pretty)
    }

    fn format_result(&self, result: &MediaResult, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(json)
    }
}
