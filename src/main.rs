// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Application entry point: CLI arguments, logging, and the COSMIC runtime.

mod app;
mod config;
mod constant;
mod domain;

use std::path::PathBuf;

use clap::Parser;
use cosmic::app::Settings;
use cosmic::iced::Size;

use crate::app::{Flags, ProductApp};

/// Command line arguments.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Image to load into the main image slot on start.
    pub file: Option<PathBuf>,
}

fn main() -> cosmic::iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting product entry form");

    let settings = Settings::default().size(Size::new(960.0, 860.0));

    cosmic::app::run::<ProductApp>(settings, Flags::Args(args))
}
