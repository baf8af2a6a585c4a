//! File, folder and collection descriptors.

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// One file or folder entry as returned by the API.
///
/// The same flat shape covers every content category. Fields that only make
/// sense for images, audio or video are `None` unless the server sent them,
/// and no numeric field is ever defaulted to zero. Values are only produced
/// by deserializing a response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Metadata {
    /// Textual id, `d<folderid>` for folders and `f<fileid>` for files.
    pub id: String,
    pub name: String,
    pub isfolder: bool,
    #[serde(with = "crate::timestamp")]
    pub created: Timestamp,
    #[serde(with = "crate::timestamp")]
    pub modified: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folderid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parentfolderid: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ismine: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isshared: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isdeleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Set when an upload replaced an existing file; the id of the file that
    /// was overwritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletedfileid: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<u32>,
    /// 64-bit content hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<u64>,

    /// Child entries, present only for recursive listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<Metadata>>,

    // Images and video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    // Audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trackno: Option<String>,

    // Video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videocodec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiocodec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videobitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiobitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiosamplerate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
}

impl Metadata {
    /// Returns the numeric id of this entry: the folder id for folders, the
    /// file id otherwise.
    pub fn numeric_id(&self) -> Option<u64> {
        if self.isfolder {
            self.folderid
        } else {
            self.fileid
        }
    }

    /// Iterates over the direct children of a folder entry.
    pub fn children(&self) -> impl Iterator<Item = &Metadata> {
        self.contents.iter().flatten()
    }
}

/// A collection (playlist or generic group of files).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Collection {
    pub id: u64,
    pub name: String,
    /// `0` for generic collections, `1` for audio playlists.
    #[serde(rename = "type", default)]
    pub kind: u32,
    #[serde(default)]
    pub items: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ismine: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<Timestamp>,
    #[serde(
        default,
        with = "crate::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub modified: Option<Timestamp>,
    /// Files in the collection, present on detail responses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<Metadata>,
}
