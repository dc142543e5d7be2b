// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Callnav CLI entrypoint.
//!
//! Loads a function catalogue (`functions.js` or plain JSON) and browses its call-flow
//! diagrams in the terminal.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use callnav::config::Config;
use callnav::model::fixtures::cart_service_dataset;
use callnav::store::DatasetFile;
use callnav::tui::TuiOptions;

fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} [<dataset>] [--at <fragment>] [--config <path>] [--no-log]\n  {program} [--dataset <path>] [--at <fragment>] [--config <path>] [--no-log]\n  {program} --demo [--at <fragment>] [--config <path>] [--no-log]\n\nThe dataset is a `functions.js` file (`const functionsData = {{...}};`) or plain JSON.\nIf no dataset is given, `[dataset] path` from the config file is used.\n--demo uses a built-in catalogue and cannot be combined with a dataset.\n--at opens a function key (the `#fragment` of a shared link) at startup.\n--config overrides the config file (default: $CALLNAV_CONFIG_PATH or <config-dir>/callnav/config.toml).\n--no-log disables the log file."
    )
}

fn print_usage(program: &str) {
    eprintln!("{}", usage(program));
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    dataset: Option<String>,
    at: Option<String>,
    demo: bool,
    config: Option<String>,
    no_log: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--dataset" => {
                if options.dataset.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.dataset = Some(path);
            }
            "--at" => {
                if options.at.is_some() {
                    return Err(());
                }
                let fragment = args.next().ok_or(())?;
                options.at = Some(fragment);
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config = Some(path);
            }
            "--no-log" => {
                if options.no_log {
                    return Err(());
                }
                options.no_log = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.dataset.is_some() {
                    return Err(());
                }
                options.dataset = Some(arg);
            }
        }
    }

    if options.demo && options.dataset.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    // Dropped only after the final error has been logged.
    let mut log_guard = None;

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "callnav".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let config_path = match &options.config {
            Some(path) => PathBuf::from(path),
            None => Config::default_path()?,
        };
        let config = Config::load(&config_path)?;

        let dataset_path = if options.demo {
            None
        } else {
            match (&options.dataset, config.dataset_path()) {
                (Some(path), _) => Some(PathBuf::from(path)),
                (None, Some(path)) => Some(path.to_owned()),
                (None, None) => {
                    print_usage(&program);
                    std::process::exit(2);
                }
            }
        };

        if !options.no_log {
            log_guard = Some(callnav::logging::init(&config.log_dir(), config.log_level())?);
        }
        tracing::debug!(config = %config_path.display(), "config loaded");

        let dataset = match dataset_path {
            Some(path) => DatasetFile::new(path).load()?,
            None => cart_service_dataset(),
        };
        tracing::info!(functions = dataset.len(), demo = options.demo, "dataset ready");

        let tui_options = TuiOptions {
            entry_points: config.entry_points(),
            toast_duration: config.toast_duration(),
            show_callers: config.show_callers(),
            initial_fragment: options.at.unwrap_or_default(),
        };
        callnav::tui::run(Arc::new(dataset), tui_options)?;

        Ok(())
    })();

    if let Err(err) = result {
        callnav::logging::log_fatal(err.as_ref(), log_guard);
        eprintln!("callnav: {err}");
        std::process::exit(1);
    }
}
