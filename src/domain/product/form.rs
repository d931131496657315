// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/product/form.rs
//
// Form container: owns the record and wires both upload slots into it.

use super::record::{FieldUpdate, ProductRecord};
use super::submit::SubmissionSink;
use super::text::TextEditing;
use crate::domain::image::{CropRegion, DisplayGeometry, RasterImage};
use crate::domain::upload::{FileLike, FileSelection, Intake, ReadRequest, UploadSlot};

/// The two upload slots of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// Single image, cropped.
    Main,
    /// Many images, forwarded as dropped.
    Additional,
}

impl SlotId {
    pub const ALL: [SlotId; 2] = [SlotId::Main, SlotId::Additional];

    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "Main Image",
            Self::Additional => "Additional Images",
        }
    }
}

/// Whether cancelling the form also clears the upload slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Only the record is reset; previews stay on screen.
    #[default]
    KeepUploads,
    /// Record and both slots are reset.
    ClearUploads,
}

/// What the crop overlay exposes to the form.
pub trait CropSource {
    /// The region the user settled on, if any.
    fn cropped_region(&self) -> Option<CropRegion>;

    /// Displayed vs. natural size the region refers to.
    fn geometry(&self) -> Option<DisplayGeometry>;
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// A required field is empty; nothing was handed to the sink.
    MissingRequired(super::record::Field),
}

/// The product form: the single owner and writer of the record.
#[derive(Debug, Clone)]
pub struct ProductForm {
    record: ProductRecord,
    main_image: UploadSlot,
    additional_images: UploadSlot,
    cancel_policy: CancelPolicy,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::new(CancelPolicy::default())
    }
}

impl ProductForm {
    pub fn new(cancel_policy: CancelPolicy) -> Self {
        Self {
            record: ProductRecord::default(),
            main_image: UploadSlot::single(),
            additional_images: UploadSlot::multiple(),
            cancel_policy,
        }
    }

    pub fn record(&self) -> &ProductRecord {
        &self.record
    }

    pub fn slot(&self, id: SlotId) -> &UploadSlot {
        match id {
            SlotId::Main => &self.main_image,
            SlotId::Additional => &self.additional_images,
        }
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut UploadSlot {
        match id {
            SlotId::Main => &mut self.main_image,
            SlotId::Additional => &mut self.additional_images,
        }
    }

    pub fn cancel_policy(&self) -> CancelPolicy {
        self.cancel_policy
    }

    pub fn set_cancel_policy(&mut self, policy: CancelPolicy) {
        self.cancel_policy = policy;
    }

    /// Replace one field of the record.
    pub fn edit(&mut self, update: FieldUpdate) {
        let record = std::mem::take(&mut self.record);
        self.record = record.apply(update);
    }

    /// Route a slot's selection into the record.
    pub fn dispatch(&mut self, id: SlotId, selection: FileSelection) {
        log::debug!("{} selection: {:?}", id.label(), selection);
        let update = match id {
            SlotId::Main => FieldUpdate::MainImage(match selection {
                FileSelection::Single(file) => Some(file),
                FileSelection::Multiple(files) => files.into_iter().next(),
                FileSelection::None => None,
            }),
            SlotId::Additional => FieldUpdate::AdditionalImages(selection.into_files()),
        };
        self.edit(update);
    }

    /// Files the record currently holds for a slot.
    pub fn selected_files(&self, id: SlotId) -> Vec<&FileLike> {
        match id {
            SlotId::Main => self.record.main_image.iter().collect(),
            SlotId::Additional => self.record.additional_images.iter().collect(),
        }
    }

    /// Slot that should receive a window drop when no zone is hovered.
    pub fn default_drop_target(&self) -> SlotId {
        if self.main_image.accepts_drops() {
            SlotId::Main
        } else {
            SlotId::Additional
        }
    }

    /// Slot that should receive a window drop, given the zone under the cursor.
    ///
    /// A hovered zone that refuses drops does not swallow them.
    pub fn drop_target(&self, hovered: Option<SlotId>) -> SlotId {
        hovered
            .filter(|id| self.slot(*id).accepts_drops())
            .unwrap_or_else(|| self.default_drop_target())
    }

    /// Offer dropped files to a slot. Returns the read the caller must perform,
    /// if the slot entered the crop flow.
    pub fn drop_files(&mut self, id: SlotId, files: Vec<FileLike>) -> Option<ReadRequest> {
        match self.slot_mut(id).accept(files) {
            Intake::Ignored => None,
            Intake::Read(request) => Some(request),
            Intake::Forward(selection) => {
                self.dispatch(id, selection);
                None
            }
        }
    }

    /// Deliver a finished read. Returns `true` if the crop overlay opened.
    pub fn finish_read(&mut self, id: SlotId, generation: u64, image: RasterImage) -> bool {
        self.slot_mut(id).finish_read(generation, image)
    }

    pub fn fail_read(&mut self, id: SlotId, generation: u64) -> bool {
        self.slot_mut(id).fail_read(generation)
    }

    /// Slot whose crop overlay is open, if any.
    pub fn cropping(&self) -> Option<SlotId> {
        SlotId::ALL
            .into_iter()
            .find(|id| self.slot(*id).crop_source().is_some())
    }

    /// Commit the open crop using the overlay's region.
    ///
    /// Returns `Ok(false)` when there was nothing to commit.
    pub fn confirm_crop(&mut self, source: &impl CropSource) -> anyhow::Result<bool> {
        let Some(id) = self.cropping() else {
            return Ok(false);
        };
        let (Some(region), Some(geometry)) = (source.cropped_region(), source.geometry()) else {
            log::debug!("Crop confirmed without a usable region");
            return Ok(false);
        };

        match self.slot_mut(id).confirm_crop(&region, &geometry)? {
            Some(selection) => {
                self.dispatch(id, selection);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn cancel_crop(&mut self) {
        if let Some(id) = self.cropping() {
            self.slot_mut(id).cancel_crop();
        }
    }

    pub fn recrop(&mut self, id: SlotId) -> bool {
        self.slot_mut(id).recrop()
    }

    pub fn remove(&mut self, id: SlotId) {
        let selection = self.slot_mut(id).remove();
        self.dispatch(id, selection);
    }

    /// Reset the record to its defaults, and the slots too when the policy says so.
    pub fn cancel(&mut self, editor: &mut impl TextEditing) {
        self.record = ProductRecord::default();
        editor.set_value(&self.record.description);

        if self.cancel_policy == CancelPolicy::ClearUploads {
            self.main_image.reset();
            self.additional_images.reset();
        }
    }

    /// Hand the record to `sink`, unless a required field is empty.
    pub fn submit(&self, sink: &mut impl SubmissionSink) -> anyhow::Result<SubmitOutcome> {
        if let Some(field) = self.record.missing_required() {
            log::info!("Not submitting: {} is required", field.label());
            return Ok(SubmitOutcome::MissingRequired(field));
        }
        sink.submit(&self.record)?;
        Ok(SubmitOutcome::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::raster::tests::png;
    use crate::domain::product::record::Field;
    use crate::domain::upload::{SlotPhase, accept_paths};
    use std::path::PathBuf;

    impl TextEditing for String {
        fn value(&self) -> String {
            self.clone()
        }

        fn set_value(&mut self, value: &str) {
            *self = value.to_string();
        }
    }

    struct FixedCrop(Option<CropRegion>);

    impl CropSource for FixedCrop {
        fn cropped_region(&self) -> Option<CropRegion> {
            self.0
        }

        fn geometry(&self) -> Option<DisplayGeometry> {
            Some(DisplayGeometry::natural(80, 60))
        }
    }

    #[derive(Default)]
    struct Collect(Vec<ProductRecord>);

    impl SubmissionSink for Collect {
        fn submit(&mut self, record: &ProductRecord) -> anyhow::Result<()> {
            self.0.push(record.clone());
            Ok(())
        }
    }

    fn files(names: &[&str]) -> Vec<FileLike> {
        accept_paths(names.iter().map(PathBuf::from))
    }

    fn half() -> FixedCrop {
        FixedCrop(Some(CropRegion::percent(0.0, 0.0, 50.0, 50.0)))
    }

    fn filled(policy: CancelPolicy) -> ProductForm {
        let mut form = ProductForm::new(policy);
        for (field, text) in [
            (Field::Name, "Desk"),
            (Field::Category, "books"),
            (Field::Model, "D-9"),
            (Field::Price, "99.5"),
            (Field::OldPrice, "120"),
            (Field::Weight, "5000"),
            (Field::Description, "<p>Oak</p>"),
        ] {
            form.edit(FieldUpdate::from_text(field, text));
        }

        let request = form.drop_files(SlotId::Main, files(&["desk.png"])).unwrap();
        assert!(form.finish_read(SlotId::Main, request.generation, png(80, 60)));
        assert!(form.confirm_crop(&half()).unwrap());
        form.drop_files(SlotId::Additional, files(&["a.png", "b.png"]));
        form
    }

    #[test]
    fn committed_crop_lands_in_main_image() {
        let mut form = ProductForm::default();
        let request = form.drop_files(SlotId::Main, files(&["desk.png"])).unwrap();
        assert_eq!(form.cropping(), None);

        form.finish_read(SlotId::Main, request.generation, png(80, 60));
        assert_eq!(form.cropping(), Some(SlotId::Main));
        assert!(form.record().main_image.is_none());

        assert!(form.confirm_crop(&half()).unwrap());
        let main = form.record().main_image.as_ref().unwrap();
        assert_eq!(main.name(), "cropped-image.jpg");
        assert_eq!(main, &FileLike::from_image(form.slot(SlotId::Main).preview().unwrap()));
        assert_eq!(form.cropping(), None);
    }

    #[test]
    fn three_files_in_multiple_mode_fill_additional_images() {
        let mut form = ProductForm::default();
        let read = form.drop_files(SlotId::Additional, files(&["a.png", "b.jpg", "c.webp"]));
        assert!(read.is_none());
        assert_eq!(form.record().additional_images.len(), 3);
        assert_eq!(form.cropping(), None);
    }

    #[test]
    fn removing_main_image_clears_record_field() {
        let mut form = filled(CancelPolicy::KeepUploads);
        form.remove(SlotId::Main);
        assert!(form.record().main_image.is_none());
        assert_eq!(form.slot(SlotId::Main).phase(), SlotPhase::Empty);

        form.remove(SlotId::Additional);
        assert!(form.record().additional_images.is_empty());
    }

    #[test]
    fn cancel_resets_every_typed_field() {
        let mut form = filled(CancelPolicy::KeepUploads);
        let mut editor = String::from("<p>Oak</p>");
        form.cancel(&mut editor);

        let record = form.record();
        assert_eq!(record.name, "");
        assert_eq!(record.category, "");
        assert_eq!(record.model, "");
        assert_eq!(record.price, 0.0);
        assert_eq!(record.old_price, 0.0);
        assert_eq!(record.weight, 0.0);
        assert_eq!(record.description, "");
        assert_eq!(editor.value(), "");
        assert_eq!(record, &ProductRecord::default());
    }

    #[test]
    fn cancel_keeping_uploads_leaves_previews() {
        let mut form = filled(CancelPolicy::KeepUploads);
        form.cancel(&mut String::new());

        assert_eq!(form.slot(SlotId::Main).phase(), SlotPhase::Previewed);
        assert_eq!(form.slot(SlotId::Additional).forwarded(), 2);
        assert!(form.record().main_image.is_none());
    }

    #[test]
    fn cancel_clearing_uploads_resets_slots() {
        let mut form = filled(CancelPolicy::ClearUploads);
        form.cancel(&mut String::new());

        assert_eq!(form.slot(SlotId::Main).phase(), SlotPhase::Empty);
        assert_eq!(form.slot(SlotId::Additional).forwarded(), 0);
        assert!(form.slot(SlotId::Main).accepts_drops());
    }

    #[test]
    fn policy_can_be_switched_at_runtime() {
        let mut form = filled(CancelPolicy::KeepUploads);
        form.set_cancel_policy(CancelPolicy::ClearUploads);
        assert_eq!(form.cancel_policy(), CancelPolicy::ClearUploads);
        form.cancel(&mut String::new());
        assert_eq!(form.slot(SlotId::Main).phase(), SlotPhase::Empty);
    }

    #[test]
    fn submit_hands_the_assembled_record_to_the_sink() {
        let form = filled(CancelPolicy::KeepUploads);
        let mut sink = Collect::default();

        assert_eq!(form.submit(&mut sink).unwrap(), SubmitOutcome::Submitted);
        assert_eq!(sink.0.len(), 1);
        let record = &sink.0[0];
        assert_eq!(record.name, "Desk");
        assert_eq!(record.price, 99.5);
        assert!(record.main_image.is_some());
        assert_eq!(record.additional_images.len(), 2);
    }

    #[test]
    fn submit_requires_a_name() {
        let form = ProductForm::default();
        let mut sink = Collect::default();
        assert_eq!(
            form.submit(&mut sink).unwrap(),
            SubmitOutcome::MissingRequired(Field::Name)
        );
        assert!(sink.0.is_empty());
    }

    #[test]
    fn confirm_without_region_commits_nothing() {
        let mut form = ProductForm::default();
        let request = form.drop_files(SlotId::Main, files(&["a.png"])).unwrap();
        form.finish_read(SlotId::Main, request.generation, png(80, 60));

        assert!(!form.confirm_crop(&FixedCrop(None)).unwrap());
        assert_eq!(form.cropping(), Some(SlotId::Main));
        assert!(form.record().main_image.is_none());
    }

    #[test]
    fn drops_go_to_additional_once_main_is_previewed() {
        let mut form = ProductForm::default();
        assert_eq!(form.default_drop_target(), SlotId::Main);

        let request = form.drop_files(SlotId::Main, files(&["a.png"])).unwrap();
        form.finish_read(SlotId::Main, request.generation, png(80, 60));
        form.confirm_crop(&half()).unwrap();
        assert_eq!(form.default_drop_target(), SlotId::Additional);
    }

    #[test]
    fn cancel_crop_closes_overlay() {
        let mut form = ProductForm::default();
        let request = form.drop_files(SlotId::Main, files(&["a.png"])).unwrap();
        form.finish_read(SlotId::Main, request.generation, png(80, 60));

        form.cancel_crop();
        assert_eq!(form.cropping(), None);
        assert_eq!(form.slot(SlotId::Main).phase(), SlotPhase::Pending);
    }

    #[test]
    fn hovered_zone_that_refuses_drops_falls_back() {
        let mut form = ProductForm::default();
        assert_eq!(form.drop_target(None), SlotId::Main);
        assert_eq!(form.drop_target(Some(SlotId::Additional)), SlotId::Additional);

        // Main keeps reporting as hovered after its crop dialog closed.
        let request = form.drop_files(SlotId::Main, files(&["a.png"])).unwrap();
        form.finish_read(SlotId::Main, request.generation, png(80, 60));
        form.confirm_crop(&half()).unwrap();

        let target = form.drop_target(Some(SlotId::Main));
        assert_eq!(target, SlotId::Additional);
        form.drop_files(target, files(&["b.png", "c.png", "d.png"]));
        assert_eq!(form.record().additional_images.len(), 3);
    }

    #[test]
    fn selected_files_follow_the_record() {
        let mut form = filled(CancelPolicy::KeepUploads);
        assert_eq!(form.selected_files(SlotId::Main).len(), 1);
        assert_eq!(form.selected_files(SlotId::Additional).len(), 2);

        form.cancel(&mut String::new());
        assert!(form.selected_files(SlotId::Main).is_empty());
        assert!(form.selected_files(SlotId::Additional).is_empty());
        // The slot still remembers its last drop; the record is what counts.
        assert_eq!(form.slot(SlotId::Additional).forwarded(), 2);
    }
}
