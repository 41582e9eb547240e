mod app;
mod middleware;
mod state;

pub use app::create_app;
pub use middleware::{api_key_auth, handle_panic, mask_internal_errors};
pub use state::AppState;
