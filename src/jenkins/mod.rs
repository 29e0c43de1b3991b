mod client;
mod provider;
mod tree;
mod types;

#[cfg(test)]
mod tests;

pub use client::JenkinsClient;
pub use provider::{JenkinsProvider, LogTarget, Resolution};
