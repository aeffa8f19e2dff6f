use std::sync::Arc;

use crate::api::ApiConnector;
use crate::config::Config;
use crate::request::FormRegistry;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub connector: Arc<dyn ApiConnector>,
    pub forms: FormRegistry,
    /// Host page the component is mounted into.
    pub host_document: String,
}
