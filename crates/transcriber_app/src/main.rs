mod app;
mod cli;
mod config;
mod effects;
mod render;

use std::process::ExitCode;

use clap::Parser;
use client_logging::LogDestination;
use transcriber_core::JobParams;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    client_logging::initialize(if args.verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    });

    let config = config::load();
    let settings = config.client_settings(args.base_url.clone());

    let result = match args.command {
        cli::Command::Run {
            file_path,
            file_name,
            upload,
            chord_algorithm,
            language,
            output,
        } => {
            let params = JobParams {
                chord_algorithm: chord_algorithm.unwrap_or(config.chord_algorithm),
                language: language.unwrap_or(config.language),
            };
            let input = match (upload, file_path) {
                (Some(local), _) => app::Input::Upload { local },
                (None, Some(file_path)) => {
                    let file_name = file_name.unwrap_or_else(|| basename(&file_path));
                    app::Input::ServerPath {
                        file_path,
                        file_name,
                    }
                }
                (None, None) => {
                    // Unreachable: clap requires one of the two.
                    return fail("either --file-path or --upload is required".to_string());
                }
            };
            app::run_pipeline(settings, params, input, output)
        }
        cli::Command::Upload { file } => app::run_upload(settings, file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => fail(message),
    }
}

fn fail(message: String) -> ExitCode {
    log::error!("{message}");
    eprintln!("{message}");
    ExitCode::FAILURE
}

fn basename(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_string()
}
