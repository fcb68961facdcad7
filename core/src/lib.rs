#![no_std]

pub mod animation;
pub mod composite;
pub mod grid;
pub mod report;
pub mod scrape;
pub mod unpack;

extern crate alloc;
