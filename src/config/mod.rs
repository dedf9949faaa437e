pub mod schema;

pub use schema::{
    BrowserConfig, ButtonSpec, Config, OnFailure, ReadyCheck, Screenshots, SettleSpec, TargetUrl,
    Viewport,
};
