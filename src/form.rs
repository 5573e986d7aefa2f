//! Form state: the six text fields and the attached photos of one pending
//! diary entry.
//!
//! [`FormState`] is the single source of truth for what will be submitted.
//! Photos are kept twice: the decoded [`Photo`]s the screen shows, and the
//! encoded text that goes on the wire. Every add keeps the two in step; a
//! cancelled pick still takes a (blank) display slot but never produces
//! encoded text.
//!
//! Removal is governed by [`PhotoRemoval`]. The default, `DisplayOnly`,
//! removes the displayed photo but keeps submitting its encoded copy, which
//! is how the screen has always behaved.

use crate::config::{PhotoRemoval, SubmissionConfig};
use crate::error::DiaryError;
use crate::output::SubmissionRequest;
use crate::pipeline::encode::encode_photo;
use crate::pipeline::photo::Photo;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Format the date picker writes into the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the six free-text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Comments,
    Date,
    Area,
    Category,
    Tags,
    Event,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Comments,
        FormField::Date,
        FormField::Area,
        FormField::Category,
        FormField::Tags,
        FormField::Event,
    ];

    /// Key used for this field in the request body.
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Comments => "comments",
            FormField::Date => "date",
            FormField::Area => "area",
            FormField::Category => "category",
            FormField::Tags => "tags",
            FormField::Event => "event",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        FormField::ALL
            .into_iter()
            .find(|f| f.as_str() == name)
            .ok_or(DiaryError::UnknownField { name })
    }
}

/// Current values of the six text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFields {
    pub comments: String,
    pub date: String,
    pub area: String,
    pub category: String,
    pub tags: String,
    pub event: String,
}

impl EntryFields {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Comments => &self.comments,
            FormField::Date => &self.date,
            FormField::Area => &self.area,
            FormField::Category => &self.category,
            FormField::Tags => &self.tags,
            FormField::Event => &self.event,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Comments => &mut self.comments,
            FormField::Date => &mut self.date,
            FormField::Area => &mut self.area,
            FormField::Category => &mut self.category,
            FormField::Tags => &mut self.tags,
            FormField::Event => &mut self.event,
        }
    }
}

#[derive(Debug, Clone)]
struct PhotoSlot {
    photo: Option<Photo>,
    encoded: bool,
}

/// Everything the user has entered for one pending diary entry.
#[derive(Debug, Clone)]
pub struct FormState {
    fields: EntryFields,
    photos: Vec<PhotoSlot>,
    encoded_photos: Vec<String>,
    line_length: usize,
    removal: PhotoRemoval,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(&SubmissionConfig::default())
    }
}

impl FormState {
    /// Empty form using the config's wrap width and removal policy.
    pub fn new(config: &SubmissionConfig) -> Self {
        Self {
            fields: EntryFields::default(),
            photos: Vec::new(),
            encoded_photos: Vec::new(),
            line_length: config.line_length,
            removal: config.photo_removal,
        }
    }

    /// Overwrite one text field. No validation.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.fields.slot_mut(field) = value.into();
    }

    /// Store a date chosen from the date picker as `yyyy-MM-dd`.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.set_field(FormField::Date, date.format(DATE_FORMAT).to_string());
    }

    pub fn field(&self, field: FormField) -> &str {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &EntryFields {
        &self.fields
    }

    /// Append a picked photo (`None` for a cancelled pick).
    ///
    /// Returns `true` when the photo was encoded and will be submitted.
    pub fn add_photo(&mut self, photo: Option<Photo>) -> bool {
        let encoded = match encode_photo(photo.as_ref(), self.line_length) {
            Some(text) => {
                self.encoded_photos.push(text);
                true
            }
            None => false,
        };
        self.photos.push(PhotoSlot { photo, encoded });
        debug!(
            "Photo slot {} added (encoded: {}); {} encoded in total",
            self.photos.len() - 1,
            encoded,
            self.encoded_photos.len()
        );
        encoded
    }

    /// Remove the displayed photo at `index`.
    ///
    /// Under [`PhotoRemoval::DisplayOnly`] the encoded copy stays in
    /// [`encoded_photos`](Self::encoded_photos) and is still submitted.
    pub fn remove_photo(&mut self, index: usize) -> Result<Option<Photo>, DiaryError> {
        if index >= self.photos.len() {
            return Err(DiaryError::PhotoIndexOutOfRange {
                index,
                len: self.photos.len(),
            });
        }

        if self.removal == PhotoRemoval::Synchronized && self.photos[index].encoded {
            let encoded_index = self.photos[..index].iter().filter(|s| s.encoded).count();
            self.encoded_photos.remove(encoded_index);
        }

        let slot = self.photos.remove(index);
        debug!(
            "Photo slot {} removed; {} displayed, {} encoded",
            index,
            self.photos.len(),
            self.encoded_photos.len()
        );
        Ok(slot.photo)
    }

    /// Displayed photos in attachment order; `None` marks a cancelled pick.
    pub fn photos(&self) -> impl Iterator<Item = Option<&Photo>> + '_ {
        self.photos.iter().map(|s| s.photo.as_ref())
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// Encoded photo text, in the order it will be submitted.
    pub fn encoded_photos(&self) -> &[String] {
        &self.encoded_photos
    }

    /// Submission is allowed iff at least one photo is encoded.
    pub fn can_submit(&self) -> bool {
        !self.encoded_photos.is_empty()
    }

    /// The only validation rule: at least one encoded photo.
    pub fn validate(&self) -> Result<(), DiaryError> {
        if self.can_submit() {
            Ok(())
        } else {
            Err(DiaryError::NoPhotosAttached)
        }
    }

    /// True when no field has text and no photo is attached.
    pub fn is_empty(&self) -> bool {
        self.fields == EntryFields::default()
            && self.photos.is_empty()
            && self.encoded_photos.is_empty()
    }

    /// Empty all fields and both photo lists.
    pub fn clear(&mut self) {
        self.fields = EntryFields::default();
        self.photos.clear();
        self.encoded_photos.clear();
    }

    /// Snapshot the form into a request body.
    pub fn to_request(&self) -> SubmissionRequest {
        let f = &self.fields;
        SubmissionRequest {
            comments: f.comments.clone(),
            date: f.date.clone(),
            area: f.area.clone(),
            category: f.category.clone(),
            tags: f.tags.clone(),
            event: f.event.clone(),
            image_data: self.encoded_photos.clone(),
        }
    }
}

/// Icon shown by a checked toggle.
pub const CHECKED_ICON: &str = "checkmark.square.fill";
/// Icon shown by an unchecked toggle.
pub const UNCHECKED_ICON: &str = "squareshape";

/// Two-state button ("include photo", "link event"). Purely cosmetic: its
/// state is never sent and never gates submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggle {
    checked: bool,
}

impl Toggle {
    /// Flip the state; returns the new state.
    pub fn tap(&mut self) -> bool {
        self.checked = !self.checked;
        self.checked
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn icon(&self) -> &'static str {
        if self.checked {
            CHECKED_ICON
        } else {
            UNCHECKED_ICON
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn photo(shade: u8) -> Photo {
        Photo::from_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            4,
            4,
            Rgb([shade, shade, shade]),
        )))
    }

    fn synchronized() -> FormState {
        let config = SubmissionConfig::builder()
            .photo_removal(PhotoRemoval::Synchronized)
            .build()
            .unwrap();
        FormState::new(&config)
    }

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in FormField::ALL {
            assert_eq!(field.as_str().parse::<FormField>().unwrap(), field);
        }
        assert_eq!(" Tags ".parse::<FormField>().unwrap(), FormField::Tags);
        assert!(matches!(
            "weather".parse::<FormField>(),
            Err(DiaryError::UnknownField { .. })
        ));
    }

    #[test]
    fn set_field_overwrites() {
        let mut form = FormState::default();
        form.set_field(FormField::Area, "north");
        form.set_field(FormField::Area, "south");
        assert_eq!(form.field(FormField::Area), "south");
        assert_eq!(form.fields().area, "south");
    }

    #[test]
    fn set_date_uses_picker_format() {
        let mut form = FormState::default();
        form.set_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(form.field(FormField::Date), "2024-03-09");
    }

    #[test]
    fn cancelled_pick_takes_slot_but_is_not_encoded() {
        let mut form = FormState::default();
        assert!(!form.add_photo(None));
        assert_eq!(form.photo_count(), 1);
        assert!(form.encoded_photos().is_empty());
        assert!(!form.can_submit());
        assert!(matches!(form.validate(), Err(DiaryError::NoPhotosAttached)));
        assert_eq!(form.photos().next(), Some(None));
    }

    #[test]
    fn add_keeps_encoded_list_in_step() {
        let mut form = FormState::default();
        assert!(form.add_photo(Some(photo(10))));
        assert!(form.add_photo(Some(photo(200))));
        assert_eq!(form.photo_count(), 2);
        assert_eq!(form.encoded_photos().len(), 2);
        assert_ne!(form.encoded_photos()[0], form.encoded_photos()[1]);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn display_only_removal_keeps_encoded_copy() {
        let mut form = FormState::default();
        form.add_photo(Some(photo(1)));
        let removed = form.remove_photo(0).unwrap();
        assert!(removed.is_some());
        assert_eq!(form.photo_count(), 0);
        assert_eq!(form.encoded_photos().len(), 1);
        assert!(form.can_submit());
    }

    #[test]
    fn synchronized_removal_drops_matching_encoded_copy() {
        let mut form = synchronized();
        form.add_photo(Some(photo(1)));
        form.add_photo(None);
        form.add_photo(Some(photo(2)));
        form.add_photo(Some(photo(3)));
        let third = form.encoded_photos()[2].clone();

        // slot 2 is the second encoded photo
        form.remove_photo(2).unwrap();
        assert_eq!(form.photo_count(), 3);
        assert_eq!(form.encoded_photos().len(), 2);
        assert_eq!(form.encoded_photos()[1], third);

        // removing the cancelled slot leaves encoded text alone
        form.remove_photo(1).unwrap();
        assert_eq!(form.encoded_photos().len(), 2);
    }

    #[test]
    fn remove_out_of_range_is_error() {
        let mut form = FormState::default();
        form.add_photo(None);
        let err = form.remove_photo(1).unwrap_err();
        assert!(matches!(
            err,
            DiaryError::PhotoIndexOutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn photo_count_tracks_adds_minus_removals() {
        let mut form = FormState::default();
        let mut expected = 0usize;
        for step in 0..20usize {
            if step % 3 == 2 && expected > 0 {
                form.remove_photo(step % expected).unwrap();
                expected -= 1;
            } else {
                let pick = (step % 4 != 0).then(|| photo(step as u8));
                form.add_photo(pick);
                expected += 1;
            }
            assert_eq!(form.photo_count(), expected);
        }
    }

    #[test]
    fn clear_empties_everything() {
        let mut form = FormState::default();
        form.set_field(FormField::Comments, "hello");
        form.add_photo(Some(photo(9)));
        assert!(!form.is_empty());
        form.clear();
        assert!(form.is_empty());
        assert_eq!(form.to_request(), SubmissionRequest::default());
    }

    #[test]
    fn to_request_copies_fields_and_photos() {
        let mut form = FormState::default();
        form.set_field(FormField::Event, "festival");
        form.add_photo(Some(photo(50)));
        let req = form.to_request();
        assert_eq!(req.event, "festival");
        assert_eq!(req.comments, "");
        assert_eq!(req.image_data, form.encoded_photos());
    }

    #[test]
    fn toggle_flips_icon() {
        let mut toggle = Toggle::default();
        assert_eq!(toggle.icon(), UNCHECKED_ICON);
        assert!(toggle.tap());
        assert_eq!(toggle.icon(), CHECKED_ICON);
        assert!(!toggle.tap());
        assert_eq!(toggle.icon(), UNCHECKED_ICON);
    }
}
