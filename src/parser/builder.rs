//! Merging partial results into one [`PrintJobInfo`]
//!
//! Every metadata source produces a [`JobUpdate`]. The extractor applies the
//! updates in source order; the [`MergeStrategy`] passed with each update decides
//! how it interacts with what earlier, usually less precise, sources found.

use crate::model::{FilamentInfo, PreviewImage, PrintJobInfo};

/// How an update is combined with the result built so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeStrategy {
    /// A non-empty filament list replaces the current one wholesale;
    /// job-level values only fill gaps
    Replace,
    /// Known values replace current ones, slot by slot
    Overwrite,
    /// Known values are only used where nothing is known yet
    FillGaps,
}

/// Filament records indexed by slot, growing on demand
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FilamentSlots {
    slots: Vec<FilamentInfo>,
}

impl FilamentSlots {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mutable access to slot `index`, extending with empty records as needed
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut FilamentInfo {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, FilamentInfo::default);
        }
        &mut self.slots[index]
    }

    /// Append a record after the last slot
    pub(crate) fn push(&mut self, filament: FilamentInfo) {
        self.slots.push(filament);
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &FilamentInfo> {
        self.slots.iter()
    }

    pub(crate) fn into_vec(self) -> Vec<FilamentInfo> {
        self.slots
    }
}

impl From<Vec<FilamentInfo>> for FilamentSlots {
    fn from(slots: Vec<FilamentInfo>) -> Self {
        Self { slots }
    }
}

/// What one metadata source knows about the job
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct JobUpdate {
    pub(crate) filaments: FilamentSlots,
    pub(crate) print_time: Option<u64>,
    pub(crate) layer_height: Option<f64>,
    pub(crate) slicer_name: Option<String>,
    pub(crate) slicer_version: Option<String>,
}

impl JobUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.filaments.iter().all(FilamentInfo::is_empty)
            && self.print_time.is_none()
            && self.layer_height.is_none()
            && self.slicer_name.is_none()
            && self.slicer_version.is_none()
    }
}

/// Accumulates updates for one parse call
#[derive(Debug)]
pub(crate) struct JobBuilder {
    file_name: String,
    filaments: FilamentSlots,
    print_time: Option<u64>,
    layer_height: Option<f64>,
    slicer_name: Option<String>,
    slicer_version: Option<String>,
    thumbnail: Option<PreviewImage>,
    plate_images: Vec<PreviewImage>,
}

impl JobBuilder {
    pub(crate) fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            filaments: FilamentSlots::new(),
            print_time: None,
            layer_height: None,
            slicer_name: None,
            slicer_version: None,
            thumbnail: None,
            plate_images: Vec::new(),
        }
    }

    pub(crate) fn apply(&mut self, update: JobUpdate, strategy: MergeStrategy) {
        let overwrite = strategy == MergeStrategy::Overwrite;

        if strategy == MergeStrategy::Replace {
            if !update.filaments.is_empty() {
                self.filaments = update.filaments;
            }
        } else {
            for (index, filament) in update.filaments.iter().enumerate() {
                self.filaments.slot_mut(index).merge_from(filament, overwrite);
            }
        }

        merge_value(&mut self.print_time, update.print_time, overwrite);
        merge_value(&mut self.layer_height, update.layer_height, overwrite);
        merge_value(&mut self.slicer_name, update.slicer_name, overwrite);
        merge_value(&mut self.slicer_version, update.slicer_version, overwrite);
    }

    pub(crate) fn set_thumbnail(&mut self, thumbnail: Option<PreviewImage>) {
        self.thumbnail = thumbnail;
    }

    pub(crate) fn set_plate_images(&mut self, images: Vec<PreviewImage>) {
        self.plate_images = images;
    }

    /// Number of filament slots collected so far
    pub(crate) fn filament_count(&self) -> usize {
        self.filaments.len()
    }

    /// Finish the job, inserting one empty placeholder if no filament was found
    pub(crate) fn finish(self) -> PrintJobInfo {
        let mut filaments = self.filaments.into_vec();
        if filaments.is_empty() {
            filaments.push(FilamentInfo::default());
        }

        PrintJobInfo {
            file_name: self.file_name,
            filaments,
            print_time: self.print_time,
            layer_height: self.layer_height,
            slicer_name: self.slicer_name,
            slicer_version: self.slicer_version,
            thumbnail: self.thumbnail,
            plate_images: self.plate_images,
        }
    }
}

fn merge_value<T>(target: &mut Option<T>, source: Option<T>, overwrite: bool) {
    if source.is_some() && (overwrite || target.is_none()) {
        *target = source;
    }
}
