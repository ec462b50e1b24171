use clap::Parser;
use seven_breaths::audio::device::AudioDeviceManager;
use seven_breaths::audio::{AudioCuePlayer, AudioLoadState, CueLoader};
use seven_breaths::cli::Cli;
use seven_breaths::config::{Configuration, SettingsStore};
use seven_breaths::logging::init_logging;
use seven_breaths::sequencer::Sequencer;
use seven_breaths::ui::app::effective_configuration;
use seven_breaths::ui::{BreathApp, run_headless};
use std::process::ExitCode;

fn settings_store(cli: &Cli) -> SettingsStore {
    if let Some(path) = &cli.settings {
        return SettingsStore::new(path.clone());
    }
    SettingsStore::in_config_dir().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to settings.json in the working directory");
        SettingsStore::new("settings.json")
    })
}

/// Open the output and start decoding the cues in the background
fn open_audio(cli: &Cli, config: &Configuration) -> (AudioCuePlayer, Option<CueLoader>, AudioLoadState) {
    if cli.no_audio {
        return (
            AudioCuePlayer::disconnected(),
            None,
            AudioLoadState::Failed("Audio disabled on the command line".into()),
        );
    }

    let player = match AudioCuePlayer::open(cli.device.as_deref(), config.gain()) {
        Ok(player) => player,
        Err(e) => {
            tracing::error!(error = %e, "Audio output unavailable");
            return (AudioCuePlayer::disconnected(), None, AudioLoadState::Failed(e.to_string()));
        }
    };

    match CueLoader::spawn(cli.assets.clone()) {
        Ok(loader) => (player, Some(loader), AudioLoadState::Loading),
        Err(e) => {
            tracing::error!(error = %e, "Could not start the cue loader");
            (player, None, AudioLoadState::Failed(e.to_string()))
        }
    }
}

fn run_terminal(
    config: Configuration,
    mut player: AudioCuePlayer,
    loader: Option<CueLoader>,
    mut load_state: AudioLoadState,
) -> ExitCode {
    if let Some(loader) = loader {
        load_state = match loader.wait() {
            Ok(bank) => {
                player.set_bank(bank);
                AudioLoadState::Ready
            }
            Err(e) => {
                eprintln!("{}", e);
                AudioLoadState::Failed(e.to_string())
            }
        };
    }

    player.set_volume(config.gain());
    let mut sequencer = Sequencer::with_player(effective_configuration(&config, &load_state), player);

    match run_headless(&mut sequencer, std::io::stdout()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Headless session aborted");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_devices {
        for device in AudioDeviceManager::new().list_output_devices() {
            let marker = if device.is_default { " (default)" } else { "" };
            println!("{}{}", device.name, marker);
        }
        return ExitCode::SUCCESS;
    }

    let settings = settings_store(&cli);
    let config = settings.load();
    tracing::info!(path = %settings.path().display(), "Settings loaded");

    let (player, loader, load_state) = open_audio(&cli, &config);

    if cli.headless {
        return run_terminal(config, player, loader, load_state);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 560.0])
            .with_title("Seven Breaths"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Seven Breaths",
        native_options,
        Box::new(|_cc| {
            Ok(Box::new(BreathApp::new(
                config, settings, player, loader, load_state,
            )))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Window closed with an error");
            ExitCode::FAILURE
        }
    }
}
