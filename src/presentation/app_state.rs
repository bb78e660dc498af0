// Application state for HTTP handlers
use crate::application::drug_service::DrugService;
use crate::presentation::theme::ThemeContext;

#[derive(Clone)]
pub struct AppState {
    pub drug_service: DrugService,
    pub theme: ThemeContext,
}
