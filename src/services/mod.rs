//! Report processing services.

pub mod check;
pub mod filter;
pub mod formatter;
pub mod junit;
pub mod matrix;
pub mod remote_config;
pub mod report;
pub mod suites;
pub mod webhook;

pub use check::CheckClient;
pub use filter::TestFilter;
pub use remote_config::{ConfigurationProvider, NoRemoteConfig, RemoteConfigProvider};
pub use report::{Report, TestReport};
pub use webhook::{HttpTransport, WebhookSender, WebhookSettings, WebhookTransport};
