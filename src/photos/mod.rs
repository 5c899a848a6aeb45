// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Photo intake: locally chosen image files awaiting a listing

pub mod preview;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

pub use preview::{Preview, PreviewHandle, PreviewRegistry};

/// MIME types the picker offers; others are still accepted but flagged
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Count shown in the upload prompt. Not enforced.
pub const SUGGESTED_PHOTO_COUNT: usize = 9;

pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.iter().any(|accepted| accepted.eq_ignore_ascii_case(mime))
}

/// Room a photo shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    #[serde(rename = "Living Room")]
    LivingRoom,
    #[serde(rename = "Dining Room")]
    DiningRoom,
    Kitchen,
    Bedroom,
    Bathroom,
    Office,
    Exterior,
    Garage,
    Hallway,
    Basement,
    Attic,
    #[serde(rename = "Patio/Deck")]
    PatioDeck,
    Other,
}

impl RoomType {
    pub const ALL: [RoomType; 13] = [
        RoomType::LivingRoom,
        RoomType::DiningRoom,
        RoomType::Kitchen,
        RoomType::Bedroom,
        RoomType::Bathroom,
        RoomType::Office,
        RoomType::Exterior,
        RoomType::Garage,
        RoomType::Hallway,
        RoomType::Basement,
        RoomType::Attic,
        RoomType::PatioDeck,
        RoomType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::LivingRoom => "Living Room",
            RoomType::DiningRoom => "Dining Room",
            RoomType::Kitchen => "Kitchen",
            RoomType::Bedroom => "Bedroom",
            RoomType::Bathroom => "Bathroom",
            RoomType::Office => "Office",
            RoomType::Exterior => "Exterior",
            RoomType::Garage => "Garage",
            RoomType::Hallway => "Hallway",
            RoomType::Basement => "Basement",
            RoomType::Attic => "Attic",
            RoomType::PatioDeck => "Patio/Deck",
            RoomType::Other => "Other",
        }
    }

    /// Parse a label as shown in the room select
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|room| room.label() == label)
    }
}

/// A file as received from the picker or a drop
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// One photo in the intake list
#[derive(Debug)]
pub struct Photo {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub room_type: Option<RoomType>,
    pub description: String,
    preview: PreviewHandle,
}

impl Photo {
    pub fn preview_url(&self) -> String {
        self.preview.url()
    }

    pub fn preview_id(&self) -> Uuid {
        self.preview.id()
    }

    pub fn is_supported_type(&self) -> bool {
        is_accepted_mime(&self.mime)
    }
}

/// Metadata edit for one photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoUpdate {
    RoomType(Option<RoomType>),
    Description(String),
}

/// Ordered list of photos and the previews they own
#[derive(Debug, Default)]
pub struct PhotoIntake {
    photos: Vec<Photo>,
    previews: PreviewRegistry,
}

impl PhotoIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry serving this intake's previews
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Append files in the order given; returns the new photo ids
    pub fn add<I>(&mut self, files: I) -> Vec<Uuid>
    where
        I: IntoIterator<Item = IncomingFile>,
    {
        let mut added = Vec::new();
        for file in files {
            let size = file.bytes.len() as u64;
            let preview = self.previews.create(file.mime.clone(), file.bytes);
            let photo = Photo {
                id: Uuid::new_v4(),
                name: file.name,
                size,
                mime: file.mime,
                room_type: None,
                description: String::new(),
                preview,
            };
            debug!("Added photo {} ({}, {})", photo.name, photo.mime, format_file_size(size));
            added.push(photo.id);
            self.photos.push(photo);
        }
        if !added.is_empty() {
            info!("Photo intake now holds {} photos", self.photos.len());
        }
        added
    }

    /// Remove a photo, releasing its preview
    pub fn remove(&mut self, id: &Uuid) -> bool {
        match self.photos.iter().position(|p| p.id == *id) {
            Some(index) => {
                let photo = self.photos.remove(index);
                debug!("Removed photo {}", photo.name);
                true
            }
            None => false,
        }
    }

    /// Apply an edit to one photo
    pub fn update(&mut self, id: &Uuid, update: PhotoUpdate) -> bool {
        let Some(photo) = self.photos.iter_mut().find(|p| p.id == *id) else {
            return false;
        };
        match update {
            PhotoUpdate::RoomType(room_type) => photo.room_type = room_type,
            PhotoUpdate::Description(description) => photo.description = description,
        }
        true
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn get(&self, id: &Uuid) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == *id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Human-readable byte count: base 1024, one decimal, `.0` dropped
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.1}", value);
    let rounded = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", rounded, UNITS[unit])
}
