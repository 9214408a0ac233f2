use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{QueryController, TermsController};

pub struct Router<'a> {
    query_controller: QueryController<'a>,
    terms_controller: TermsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            query_controller: QueryController::new(container),
            terms_controller: TermsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Query { text, pretty } => self.query_controller.query(text, pretty).await,
            Commands::Terms { text } => self.terms_controller.terms(text).await,
            Commands::Serve { .. } => unreachable!("Serve command is handled separately in main"),
        }
    }
}
