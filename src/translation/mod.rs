// Translation adapter module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::Translator;
