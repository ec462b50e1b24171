// Main window - Settings form while idle, sequence board while running

use crate::audio::{AudioCuePlayer, AudioLoadState, CueLoader, DeviceStatus};
use crate::config::{Configuration, MAX_PHASE_TICKS, MAX_REPEAT_COUNT, MAX_VOLUME, SettingsStore};
use crate::messaging::notification::{Notification, NotificationCategory, NotificationLevel};
use crate::sequencer::format::{count_label, format_session_time};
use crate::sequencer::projection::total_session_ticks;
use crate::sequencer::{Phase, Projection, SEQUENCE_TABLE, Sequencer};
use eframe::egui;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Repaint cadence while the asset loader is still working
const LOADER_POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_NOTIFICATIONS: usize = 10;

const ACTIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(240, 240, 240);
const REST_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
const DIM_COLOR: egui::Color32 = egui::Color32::from_gray(90);

/// Configuration handed to the sequencer: audio is forced off once loading failed
pub fn effective_configuration(config: &Configuration, load_state: &AudioLoadState) -> Configuration {
    let mut effective = config.clone();
    effective.audio_enabled &= load_state.error().is_none();
    effective
}

/// Start waits for the cue assets only when audio is wanted
pub fn can_start(config: &Configuration, load_state: &AudioLoadState) -> bool {
    !(config.audio_enabled && load_state.is_loading())
}

/// Persistent warning shown while cues are wanted but the output stream failed
pub fn output_warning(config: &Configuration, status: DeviceStatus) -> Option<&'static str> {
    (config.audio_enabled && status == DeviceStatus::Error)
        .then_some("Audio output failed, cues are silent")
}

pub struct BreathApp {
    sequencer: Sequencer<AudioCuePlayer>,
    projection: Rc<RefCell<Projection>>,
    settings: SettingsStore,
    config: Configuration,
    loader: Option<CueLoader>,
    load_state: AudioLoadState,
    notification_queue: VecDeque<Notification>,
}

impl BreathApp {
    pub fn new(
        config: Configuration,
        settings: SettingsStore,
        player: AudioCuePlayer,
        loader: Option<CueLoader>,
        load_state: AudioLoadState,
    ) -> Self {
        player.set_volume(config.gain());

        let mut sequencer =
            Sequencer::with_player(effective_configuration(&config, &load_state), player);
        let projection = Rc::new(RefCell::new(sequencer.projection()));

        let latest = Rc::clone(&projection);
        sequencer.subscribe(move |p| *latest.borrow_mut() = p.clone());

        Self {
            sequencer,
            projection,
            settings,
            config,
            loader,
            load_state,
            notification_queue: VecDeque::new(),
        }
    }

    fn push_notification(&mut self, notification: Notification) {
        self.notification_queue.push_back(notification);
        if self.notification_queue.len() > MAX_NOTIFICATIONS {
            self.notification_queue.pop_front();
        }
    }

    fn poll_loader(&mut self) {
        let Some(result) = self.loader.as_mut().and_then(CueLoader::poll) else {
            return;
        };
        self.loader = None;

        match result {
            Ok(bank) => {
                self.sequencer.player_mut().set_bank(bank);
                self.load_state = AudioLoadState::Ready;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load audio cues");
                self.load_state = AudioLoadState::Failed(e.to_string());
                self.push_notification(Notification::error(
                    NotificationCategory::Audio,
                    e.to_string(),
                ));
                self.sequencer
                    .update_configuration(effective_configuration(&self.config, &self.load_state));
            }
        }
    }

    fn update_notifications(&mut self) {
        for notification in self.sequencer.player_mut().drain_notifications() {
            self.push_notification(notification);
        }
    }

    /// Apply an edited configuration everywhere and persist it
    fn apply_configuration(&mut self, config: Configuration) {
        self.config = config.normalized();
        self.sequencer.player().set_volume(self.config.gain());
        self.sequencer
            .update_configuration(effective_configuration(&self.config, &self.load_state));

        if let Err(e) = self.settings.save(&self.config) {
            tracing::warn!(error = %e, path = %self.settings.path().display(), "Failed to save settings");
            self.push_notification(Notification::warning(
                NotificationCategory::Settings,
                format!("Settings not saved: {}", e),
            ));
        }
    }

    fn draw_settings(&mut self, ui: &mut egui::Ui) {
        let mut edited = self.config.clone();

        ui.heading("Breath");
        ui.add_space(10.0);

        ui.label(egui::RichText::new("Timing").strong());
        for phase in Phase::ALL {
            ui.horizontal(|ui| {
                ui.label(format!("{}:", phase.label()));
                let mut ticks = edited.timing.get(phase);
                ui.add(
                    egui::DragValue::new(&mut ticks)
                        .range(1..=MAX_PHASE_TICKS)
                        .suffix(" s"),
                );
                edited.timing.set(phase, ticks);
            });
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label("Repeats per step:");
            ui.add(egui::DragValue::new(&mut edited.repeat_count_per_step).range(1..=MAX_REPEAT_COUNT));
        });
        ui.checkbox(&mut edited.loop_enabled, "Repeat program");

        ui.add_space(10.0);
        ui.label(format!(
            "Session time: {}",
            format_session_time(total_session_ticks(&edited))
        ));

        ui.add_space(10.0);
        if let Some(error) = self.load_state.error() {
            ui.colored_label(egui::Color32::RED, error);
        }
        let audio_available = self.load_state.error().is_none();
        let mut audio_checked = edited.audio_enabled && audio_available;
        if ui
            .add_enabled(
                audio_available,
                egui::Checkbox::new(&mut audio_checked, "Audio enabled"),
            )
            .changed()
        {
            edited.audio_enabled = audio_checked;
        }
        if self.load_state.is_loading() && edited.audio_enabled {
            ui.label("Loading audio...");
        }

        ui.horizontal(|ui| {
            ui.label("Volume:");
            ui.add(egui::Slider::new(&mut edited.volume, 0..=MAX_VOLUME));
        });

        if edited != self.config {
            self.apply_configuration(edited);
        }

        ui.add_space(20.0);
        let start = egui::Button::new(egui::RichText::new("Start").size(20.0));
        if ui
            .add_enabled(can_start(&self.config, &self.load_state), start)
            .clicked()
        {
            self.sequencer.start();
        }
    }

    fn draw_board(&self, ui: &mut egui::Ui) {
        let projection = self.projection.borrow().clone();
        let resting = projection.phase == Phase::Rest;

        egui::Grid::new("sequence_board")
            .spacing([24.0, 12.0])
            .show(ui, |ui| {
                for (sequence_index, sequence) in SEQUENCE_TABLE.iter().enumerate() {
                    let current = sequence_index == projection.sequence_index;

                    for phase in Phase::ALL {
                        let color = if current && phase == projection.phase {
                            if resting { REST_COLOR } else { ACTIVE_COLOR }
                        } else {
                            DIM_COLOR
                        };
                        ui.label(egui::RichText::new(phase.label()).size(24.0).color(color));
                    }

                    for (step_index, step) in sequence.iter().enumerate() {
                        let active = current && step_index == projection.step_index && !resting;
                        let color = if active { ACTIVE_COLOR } else { DIM_COLOR };
                        ui.label(egui::RichText::new(step.label()).size(24.0).color(color));
                    }

                    if current {
                        ui.label(egui::RichText::new(count_label(&projection)).size(24.0).strong());
                    } else {
                        ui.label("");
                    }
                    ui.end_row();
                }
            });

        ui.add_space(10.0);
        ui.label(egui::RichText::new("Click anywhere to stop").color(DIM_COLOR));
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        let status = self.sequencer.player().device_status();
        if let Some(warning) = output_warning(self.sequencer.configuration(), status) {
            ui.separator();
            ui.colored_label(egui::Color32::RED, warning);
        }

        let recent: Vec<&Notification> = self
            .notification_queue
            .iter()
            .rev()
            .filter(|n| n.is_recent(5000))
            .take(3)
            .collect();

        if recent.is_empty() {
            return;
        }

        ui.separator();
        ui.horizontal(|ui| {
            for notification in recent {
                let color = match notification.level {
                    NotificationLevel::Info => egui::Color32::from_rgb(100, 150, 255),
                    NotificationLevel::Warning => egui::Color32::from_rgb(255, 165, 0),
                    NotificationLevel::Error => egui::Color32::RED,
                };
                ui.colored_label(color, &notification.message);
                ui.add_space(10.0);
            }
        });
    }
}

impl eframe::App for BreathApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();
        self.update_notifications();

        let now = Instant::now();
        self.sequencer.pump(now);

        if self.sequencer.is_running() && ctx.input(|i| i.pointer.any_click()) {
            self.sequencer.stop();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.sequencer.is_running() {
                self.draw_board(ui);
            } else {
                self.draw_settings(ui);
            }
            self.draw_status_bar(ui);
        });

        let next_repaint = match self.sequencer.next_tick_in(Instant::now()) {
            Some(wait) => Some(wait),
            None if self.loader.is_some() => Some(LOADER_POLL_INTERVAL),
            None => None,
        };
        if let Some(wait) = next_repaint {
            ctx.request_repaint_after(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_load_forces_audio_off() {
        let config = Configuration::default();
        assert!(config.audio_enabled);

        let failed = AudioLoadState::Failed("Missing audio asset".into());
        assert!(!effective_configuration(&config, &failed).audio_enabled);
        assert!(effective_configuration(&config, &AudioLoadState::Loading).audio_enabled);
        assert!(effective_configuration(&config, &AudioLoadState::Ready).audio_enabled);
    }

    #[test]
    fn test_effective_configuration_keeps_other_fields() {
        let mut config = Configuration::default();
        config.repeat_count_per_step = 3;
        config.loop_enabled = true;

        let effective = effective_configuration(&config, &AudioLoadState::Failed("x".into()));
        assert_eq!(effective.repeat_count_per_step, 3);
        assert!(effective.loop_enabled);
        assert_eq!(effective.timing, config.timing);
    }

    #[test]
    fn test_output_warning_only_on_stream_error() {
        let mut config = Configuration::default();
        assert!(output_warning(&config, DeviceStatus::Error).is_some());
        assert!(output_warning(&config, DeviceStatus::Connected).is_none());
        assert!(output_warning(&config, DeviceStatus::Disconnected).is_none());

        config.audio_enabled = false;
        assert!(output_warning(&config, DeviceStatus::Error).is_none());
    }

    #[test]
    fn test_start_waits_for_audio_only_when_enabled() {
        let mut config = Configuration::default();
        assert!(!can_start(&config, &AudioLoadState::Loading));
        assert!(can_start(&config, &AudioLoadState::Ready));
        assert!(can_start(&config, &AudioLoadState::Failed("x".into())));

        config.audio_enabled = false;
        assert!(can_start(&config, &AudioLoadState::Loading));
    }
}
