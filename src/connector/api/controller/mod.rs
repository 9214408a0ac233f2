pub mod query_controller;
pub mod terms_controller;

pub use query_controller::QueryController;
pub use terms_controller::TermsController;
