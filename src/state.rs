use crate::config::AppConfig;
use crate::ports::PushSender;

#[derive(Clone)]
pub struct AppState<S: PushSender> {
    pub config: AppConfig,
    pub sender: S,
}
