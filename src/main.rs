// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thetis CLI entrypoint.
//!
//! Loads a flowchart file, renders it, and prints the grid to stdout. With
//! `--export` the rendered diagram is written to a text file instead.

use std::error::Error;

use thetis::render::{render, ViewState};
use thetis::store;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <file.flow> [--width <cols>] [--height <rows>]\n  {program} <file.flow> --export <out.txt>\n\nRenders the diagram to stdout sized to its content, or to an explicit\n--width/--height viewport. --export writes the rendered text to a file\ninstead of printing it."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    export: Option<String>,
    width: Option<i32>,
    height: Option<i32>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => {
                if options.export.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.export = Some(path);
            }
            "--width" => {
                if options.width.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let width: i32 = raw.parse().map_err(|_| ())?;
                options.width = Some(width);
            }
            "--height" => {
                if options.height.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let height: i32 = raw.parse().map_err(|_| ())?;
                options.height = Some(height);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    if options.file.is_none() {
        return Err(());
    }

    if options.export.is_some() && (options.width.is_some() || options.height.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "thetis".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let file = options.file.as_deref().unwrap_or_default();
        let canvas = store::load_from_file(file.as_ref())?;

        if let Some(out) = options.export {
            store::export_ascii(&canvas, out.as_ref())?;
            return Ok(());
        }

        let (content_w, content_h) = store::content_extent(&canvas);
        let width = options.width.unwrap_or(content_w);
        let height = options.height.unwrap_or(content_h);
        let grid = render(&canvas, width, height, &ViewState::default());
        for row in grid.rows() {
            println!("{row}");
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("thetis: {err}");
        std::process::exit(1);
    }
}
