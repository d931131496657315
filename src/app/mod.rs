// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// COSMIC application wiring and main app struct.

pub mod message;
pub mod model;
pub mod update;
pub mod view;

use std::path::Path;

use cosmic::app::Core;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::event::{self, Event};
use cosmic::iced::keyboard::{self, Key, Modifiers, key::Named};
use cosmic::iced::{Subscription, window};
use cosmic::{Action, Element, Task};

pub use message::AppMessage;
pub use model::AppModel;

use crate::Args;
use crate::app::message::CropMessage;
use crate::config::AppConfig;
use crate::domain::product::SlotId;
use crate::domain::upload::FileLike;

/// Flags passed from `main` into the application.
#[derive(Debug, Clone)]
pub enum Flags {
    Args(Args),
}

/// Main application type.
pub struct ProductApp {
    core: Core,
    pub model: AppModel,
    pub config: AppConfig,
    config_handler: Option<cosmic_config::Config>,
}

impl cosmic::Application for ProductApp {
    type Executor = cosmic::SingleThreadExecutor;
    type Flags = Flags;
    type Message = AppMessage;

    const APP_ID: &'static str = "io.github.productentry.ProductEntry";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, Task<Action<Self::Message>>) {
        // Load persisted config.
        let (config, config_handler) =
            match cosmic_config::Config::new(Self::APP_ID, AppConfig::VERSION) {
                Ok(handler) => {
                    let config = AppConfig::get_entry(&handler).unwrap_or_else(|(errs, config)| {
                        for err in errs {
                            log::warn!("Invalid config entry: {err}");
                        }
                        config
                    });
                    (config, Some(handler))
                }
                Err(err) => {
                    log::warn!("Config unavailable, using defaults: {err}");
                    (AppConfig::default(), None)
                }
            };

        let Flags::Args(args) = flags;
        let mut model = AppModel::new(&config);

        // A file given on the command line goes straight into the main image crop flow.
        let init_task = match args.file {
            Some(path) => preload(&mut model, &path),
            None => Task::none(),
        };

        (
            Self {
                core,
                model,
                config,
                config_handler,
            },
            init_task,
        )
    }

    fn update(&mut self, message: Self::Message) -> Task<Action<Self::Message>> {
        match update::update(self, &message) {
            update::UpdateResult::None => Task::none(),
            update::UpdateResult::Task(task) => task,
        }
    }

    fn view(&self) -> Element<'_, Self::Message> {
        view::view(&self.model, &self.config)
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        Subscription::batch([
            keyboard::on_key_press(handle_key_press),
            event::listen_with(handle_window_event),
        ])
    }
}

impl ProductApp {
    /// Save current config to disk.
    pub fn save_config(&self) {
        if let Some(ref handler) = self.config_handler
            && let Err(err) = self.config.write_entry(handler)
        {
            log::warn!("Failed to save config: {err}");
        }
    }
}

/// Offer a file to the main image slot before the window opens.
fn preload(model: &mut AppModel, path: &Path) -> Task<Action<AppMessage>> {
    let Some(file) = FileLike::from_path(path) else {
        log::error!("Unsupported image {}", path.display());
        return Task::none();
    };

    match model.form.drop_files(SlotId::Main, vec![file]) {
        Some(request) => update::read_task(SlotId::Main, request),
        None => Task::none(),
    }
}

/// Map raw key presses into crop dialog actions.
fn handle_key_press(key: Key, modifiers: Modifiers) -> Option<AppMessage> {
    if modifiers.command() || modifiers.alt() || modifiers.logo() {
        return None;
    }

    // Validated in update: ignored unless a crop dialog is open.
    match key.as_ref() {
        Key::Named(Named::Enter) => Some(AppMessage::Crop(CropMessage::Apply)),
        Key::Named(Named::Escape) => Some(AppMessage::Crop(CropMessage::Cancel)),
        _ => None,
    }
}

/// Forward OS file drops; one event arrives per dropped path.
fn handle_window_event(
    event: Event,
    _status: event::Status,
    _id: window::Id,
) -> Option<AppMessage> {
    match event {
        Event::Window(window::Event::FileDropped(path)) => Some(AppMessage::FileDropped(path)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_escape_drive_the_crop_dialog() {
        let none = Modifiers::empty();
        assert!(matches!(
            handle_key_press(Key::Named(Named::Enter), none),
            Some(AppMessage::Crop(CropMessage::Apply))
        ));
        assert!(matches!(
            handle_key_press(Key::Named(Named::Escape), none),
            Some(AppMessage::Crop(CropMessage::Cancel))
        ));
        assert!(handle_key_press(Key::Named(Named::Enter), Modifiers::CTRL).is_none());
    }

    #[test]
    fn only_file_drops_are_forwarded() {
        let id = window::Id::unique();
        let dropped = handle_window_event(
            Event::Window(window::Event::FileDropped("/tmp/shoe.png".into())),
            event::Status::Ignored,
            id,
        );
        assert!(matches!(dropped, Some(AppMessage::FileDropped(path)) if path.ends_with("shoe.png")));

        let hovered = handle_window_event(
            Event::Window(window::Event::FileHovered("/tmp/shoe.png".into())),
            event::Status::Ignored,
            id,
        );
        assert!(hovered.is_none());
    }

    #[test]
    fn preload_rejects_unsupported_files() {
        let mut model = AppModel::new(&AppConfig::default());
        let _ = preload(&mut model, Path::new("/tmp/manual.pdf"));
        assert!(!model.form.slot(SlotId::Main).is_reading());

        let _ = preload(&mut model, Path::new("/tmp/shoe.png"));
        assert!(model.form.slot(SlotId::Main).is_reading());
    }
}
