// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/upload/mod.rs
//
// Upload intake: accepted files, drop batching and per-slot lifecycle.

pub mod file;
pub mod intake;
pub mod slot;

pub use file::{FileLike, FileSelection, FileSource};
pub use intake::{DropBatch, accept_paths, accepted_extensions};
pub use slot::{Intake, ReadRequest, SlotMode, SlotPhase, UploadSlot};
