// src/lib.rs

pub mod http;
pub mod platforms;
pub mod services;
pub mod tasks;
pub mod test_utils;

pub use balloonbot_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
