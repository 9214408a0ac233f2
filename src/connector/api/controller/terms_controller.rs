use anyhow::Result;

use crate::domain::Term;

use super::super::Container;

pub struct TermsController<'a> {
    container: &'a Container,
}

impl<'a> TermsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn terms(&self, text: String) -> Result<String> {
        let use_case = self.container.extract_terms_use_case();
        let terms = use_case.try_execute(&text).await?;

        Ok(self.format_terms(terms.iter()))
    }

    fn format_terms<'t>(&self, terms: impl ExactSizeIterator<Item = &'t Term>) -> String {
        if terms.len() == 0 {
            return format!(
                "No anatomy terms found (extractor: {}).",
                self.container.extractor_name()
            );
        }

        let mut output = format!("Found {} anatomy terms:\n", terms.len());
        for term in terms {
            output.push_str(&format!("  - {}\n", term));
        }
        output
    }
}
