use dioxus::prelude::{use_signal, Signal};

use crate::config::AppConfig;
use crate::usecase::services::session::EditorSession;

pub struct AppState {
    pub session: Signal<EditorSession>,
    pub show_filters: Signal<bool>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: use_signal(move || EditorSession::new(config)),
            show_filters: use_signal(|| true),
        }
    }
}
