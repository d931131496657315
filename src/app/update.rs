// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/update.rs
//
// Message handling: applies application messages to the model.

use std::path::PathBuf;

use cosmic::{Action, Task};

use crate::app::message::{AppMessage, CropMessage};
use crate::app::view::crop::CropSelection;
use crate::app::ProductApp;
use crate::constant::DROP_BATCH_WINDOW;
use crate::domain::product::{
    CancelPolicy, FieldUpdate, LogSink, SlotId, SubmitOutcome, TextEditing, category_value,
};
use crate::domain::upload::{ReadRequest, SlotMode, accept_paths, accepted_extensions};

/// Result of handling one message.
pub enum UpdateResult {
    None,
    Task(Task<Action<AppMessage>>),
}

pub fn update(app: &mut ProductApp, message: &AppMessage) -> UpdateResult {
    match message {
        // ---- Record fields ----------------------------------------------------
        AppMessage::FieldEdited(field, text) => {
            if field.is_numeric() {
                app.model.drafts.set(*field, text);
            }
            app.model.form.edit(FieldUpdate::from_text(*field, text));
            app.model.notice = None;
        }

        AppMessage::CategorySelected(index) => {
            let category = category_value(*index).to_string();
            app.model.form.edit(FieldUpdate::Category(category));
        }

        AppMessage::DescriptionEdited(action) => {
            if app.model.description.perform(action.clone()) {
                sync_description(app);
            }
        }

        AppMessage::FormatDescription(markup) => {
            app.model.description.format(*markup);
            sync_description(app);
        }

        // ---- Upload zones -----------------------------------------------------
        AppMessage::PickFiles(slot) => {
            let slot = *slot;
            let directory = app.config.default_image_dir.clone();
            let multiple = app.model.form.slot(slot).mode() == SlotMode::Multiple;

            return UpdateResult::Task(Task::perform(
                pick_files(directory, multiple),
                move |paths| Action::App(AppMessage::FilesPicked(slot, paths)),
            ));
        }

        AppMessage::FilesPicked(slot, paths) => {
            if let Some(dir) = paths.first().and_then(|path| path.parent()) {
                app.config.default_image_dir = Some(dir.to_path_buf());
                app.save_config();
            }
            return deliver(app, *slot, paths.clone());
        }

        AppMessage::HoverEnter(slot) => {
            app.model.hovered = Some(*slot);
        }

        AppMessage::HoverExit(slot) => {
            if app.model.hovered == Some(*slot) {
                app.model.hovered = None;
            }
        }

        AppMessage::FileDropped(path) => {
            if let Some(generation) = app.model.drop_batch.push(path.clone()) {
                return UpdateResult::Task(Task::perform(
                    tokio::time::sleep(DROP_BATCH_WINDOW),
                    move |_| Action::App(AppMessage::FlushDrop(generation)),
                ));
            }
        }

        AppMessage::FlushDrop(generation) => {
            let Some(paths) = app.model.drop_batch.take(*generation) else {
                return UpdateResult::None;
            };
            let target = app.model.form.drop_target(app.model.hovered);
            log::debug!("{} file(s) dropped on {}", paths.len(), target.label());
            return deliver(app, target, paths);
        }

        AppMessage::ReadFinished {
            slot,
            generation,
            result,
        } => match result {
            Ok(image) => {
                if app.model.form.finish_read(*slot, *generation, image.clone()) {
                    open_crop(app, *slot);
                } else {
                    log::debug!("Ignoring stale read for {}", slot.label());
                }
            }
            Err(err) => {
                if app.model.form.fail_read(*slot, *generation) {
                    log::warn!("Failed to read image for {}: {}", slot.label(), err);
                    app.model.set_error(format!("Could not open image: {err}"));
                } else {
                    log::debug!("Ignoring stale failed read for {}", slot.label());
                }
            }
        },

        AppMessage::Recrop(slot) => {
            if app.model.form.recrop(*slot) {
                open_crop(app, *slot);
            }
        }

        AppMessage::Remove(slot) => {
            app.model.form.remove(*slot);
            close_crop_if_done(app);
            app.model.sync_images();
        }

        // ---- Crop dialog ------------------------------------------------------
        AppMessage::Crop(crop) => handle_crop(app, crop),

        // ---- Form -------------------------------------------------------------
        AppMessage::Submit => match app.model.form.submit(&mut LogSink) {
            Ok(SubmitOutcome::Submitted) => {
                app.model.clear_error();
                app.model.notice = Some("Product submitted".to_string());
            }
            Ok(SubmitOutcome::MissingRequired(field)) => {
                app.model.set_error(format!("{} is required", field.label()));
            }
            Err(err) => {
                log::error!("Submission failed: {err:#}");
                app.model.set_error(format!("Submission failed: {err}"));
            }
        },

        AppMessage::Cancel => {
            app.model.form.cancel(&mut app.model.description);
            app.model.drafts.clear();
            app.model.clear_error();
            app.model.notice = None;

            if app.model.form.cancel_policy() == CancelPolicy::ClearUploads {
                close_crop_if_done(app);
                app.model.sync_images();
            }
        }

        AppMessage::ClearError => app.model.clear_error(),
    }

    UpdateResult::None
}

fn handle_crop(app: &mut ProductApp, message: &CropMessage) {
    // Enter/Escape arrive from the keyboard even with no dialog open.
    if app.model.form.cropping().is_none() {
        return;
    }

    match message {
        CropMessage::DragStart { x, y, handle } => {
            app.model.crop_selection.start_handle_drag(*handle, *x, *y);
        }
        CropMessage::DragMove { x, y } => {
            app.model.crop_selection.update_drag(*x, *y);
        }
        CropMessage::DragEnd => {
            app.model.crop_selection.end_drag();
        }
        CropMessage::Apply => match app.model.form.confirm_crop(&app.model.crop_selection) {
            Ok(true) => {
                // The form is rebuilt without the zones' hover state.
                app.model.hovered = None;
                app.model.crop_selection.reset();
                app.model.sync_images();
            }
            Ok(false) => log::debug!("Nothing to crop yet"),
            Err(err) => {
                log::error!("Failed to crop image: {err:#}");
                app.model.set_error(format!("Failed to crop image: {err}"));
            }
        },
        CropMessage::Cancel => {
            app.model.hovered = None;
            app.model.form.cancel_crop();
            app.model.crop_selection.reset();
            app.model.sync_images();
        }
    }
}

/// Store the editor text in the record.
fn sync_description(app: &mut ProductApp) {
    let description = app.model.description.value();
    app.model.form.edit(FieldUpdate::Description(description));
}

/// Hand a set of picked or dropped paths to a slot.
fn deliver(app: &mut ProductApp, slot: SlotId, paths: Vec<PathBuf>) -> UpdateResult {
    let files = accept_paths(paths);
    if files.is_empty() {
        return UpdateResult::None;
    }

    let request = app.model.form.drop_files(slot, files);
    app.model.sync_images();

    match request {
        Some(request) => UpdateResult::Task(read_task(slot, request)),
        None => UpdateResult::None,
    }
}

/// Read the requested file in the background and report back to `slot`.
pub fn read_task(slot: SlotId, request: ReadRequest) -> Task<Action<AppMessage>> {
    let ReadRequest { generation, file } = request;
    Task::perform(file.read(), move |result| {
        Action::App(AppMessage::ReadFinished {
            slot,
            generation,
            result: result.map_err(|err| format!("{err:#}")),
        })
    })
}

/// Start the crop dialog over the slot's pending image.
fn open_crop(app: &mut ProductApp, slot: SlotId) {
    // The dialog replaces the drop zones, so they never see the cursor leave.
    app.model.hovered = None;
    if let Some(image) = app.model.form.slot(slot).crop_source() {
        let (width, height) = image.dimensions();
        app.model.crop_selection = CropSelection::open(width, height, app.config.aspect_ratio());
    }
    app.model.sync_images();
}

fn close_crop_if_done(app: &mut ProductApp) {
    if app.model.form.cropping().is_none() {
        app.model.crop_selection.reset();
    }
}

async fn pick_files(directory: Option<PathBuf>, multiple: bool) -> Vec<PathBuf> {
    let extensions = accepted_extensions();
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Select images")
        .add_filter("Images", extensions.as_slice());
    if let Some(directory) = directory.filter(|dir| dir.exists()) {
        dialog = dialog.set_directory(directory);
    }

    if multiple {
        dialog
            .pick_files()
            .await
            .unwrap_or_default()
            .iter()
            .map(|file| file.path().to_path_buf())
            .collect()
    } else {
        dialog
            .pick_file()
            .await
            .map(|file| file.path().to_path_buf())
            .into_iter()
            .collect()
    }
}
