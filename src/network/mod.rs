//! HTTP plumbing for remote suggestion services

pub mod client;

pub use client::{HttpClient, HttpResponse};
