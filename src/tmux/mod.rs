mod client;
mod descriptor;

pub use client::TmuxClient;
pub use descriptor::{basename, find_descriptor, name_from_descriptor, resolve_session_name};
