//! Google Compute Engine provider for lab-gcp
//!
//! Wraps the `gcloud` CLI (instances, machine types, scp) and `gsutil`
//! (bucket uploads). The one call the CLI cannot express — a label update
//! with an explicit fingerprint — goes through the Compute REST API with a
//! token minted by `gcloud auth print-access-token`.

pub mod api;
pub mod error;
pub mod gcloud;
pub mod gsutil;
pub mod provider;
pub mod startup;

pub use error::{GceError, Result};
pub use gcloud::Gcloud;
pub use gsutil::Gsutil;
pub use provider::GceProvider;
pub use startup::render_startup_script;
