pub mod config;
pub mod error;
pub mod router;
pub mod state;

pub mod models {
    pub mod credentials;
    pub mod profile;
}

pub mod validation {
    pub mod lookup;
}

pub mod services {
    pub mod account;
}

pub mod telegram {
    pub mod client;
    pub mod string_session;
}

pub mod handlers {
    pub mod index;
    pub mod lookup;
}

pub use config::Config;
pub use router::build_router;
pub use state::AppState;
