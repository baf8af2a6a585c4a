//! Rendering typed requests into wire parameters.
//!
//! Every request type implements [`ToParams`], producing an ordered [`Params`]
//! list. The transport turns that list into a query string (GET), a
//! URL-encoded form (POST) or the text parts of a multipart body (uploads).
//!
//! Rendering rules:
//! - an optional value that is `None` produces no entry at all;
//! - a flag renders as `1` when set and is omitted otherwise;
//! - id lists are comma-joined and omitted when empty.

use std::{fmt, str::FromStr};

use crate::{
    error::ValidationError,
    timestamp::{self, Timestamp},
};

/// Ordered wire parameters for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required value.
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key, value.into()));
        self
    }

    /// Adds a required number.
    pub fn push_num(&mut self, key: &'static str, value: impl Into<i64>) -> &mut Self {
        self.push(key, value.into().to_string())
    }

    /// Adds a required id.
    pub fn push_u64(&mut self, key: &'static str, value: u64) -> &mut Self {
        self.push(key, value.to_string())
    }

    /// Adds a value only when present.
    pub fn push_opt(&mut self, key: &'static str, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Adds a number only when present.
    pub fn push_opt_num(&mut self, key: &'static str, value: Option<impl Into<i64>>) -> &mut Self {
        if let Some(value) = value {
            self.push_num(key, value);
        }
        self
    }

    /// Adds a `u64` only when present.
    pub fn push_opt_u64(&mut self, key: &'static str, value: Option<u64>) -> &mut Self {
        if let Some(value) = value {
            self.push_u64(key, value);
        }
        self
    }

    /// Adds `key=1` when `value` is true; false is omitted.
    pub fn push_flag(&mut self, key: &'static str, value: bool) -> &mut Self {
        if value {
            self.push(key, "1");
        }
        self
    }

    /// Adds an explicit `1` or `0`, or nothing when unset.
    ///
    /// Only for parameters whose remote default differs from `0`.
    pub fn push_bool(&mut self, key: &'static str, value: Option<bool>) -> &mut Self {
        match value {
            Some(true) => self.push(key, "1"),
            Some(false) => self.push(key, "0"),
            None => self,
        }
    }

    /// Adds a comma-joined id list; an empty list is omitted.
    pub fn push_ids(&mut self, key: &'static str, ids: &[u64]) -> &mut Self {
        if !ids.is_empty() {
            let joined = ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.push(key, joined);
        }
        self
    }

    /// Adds a timestamp in the wire layout, only when present.
    pub fn push_timestamp(&mut self, key: &'static str, value: Option<Timestamp>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, timestamp::format(&value));
        }
        self
    }

    /// Returns the value rendered for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the rendered pairs in insertion order.
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders the pairs as a percent-encoded query string without the
    /// leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Renders a request into wire parameters.
pub trait ToParams {
    fn to_params(&self) -> Params;
}

impl ToParams for Params {
    fn to_params(&self) -> Params {
        self.clone()
    }
}

/// A single folder-share permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Create,
    Modify,
    Delete,
}

impl Permission {
    /// The bit this permission contributes to the wire bitmask.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Create => 1,
            Self::Modify => 2,
            Self::Delete => 4,
        }
    }
}

impl FromStr for Permission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "modify" => Ok(Self::Modify),
            "delete" => Ok(Self::Delete),
            _ => Err(ValidationError::Invalid {
                field: "permissions",
                reason: "expected one of create, modify, delete",
            }),
        }
    }
}

/// A non-empty set of [`Permission`]s, sent as the sum of their bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permissions(u8);

impl Permissions {
    /// Builds a permission set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] if `permissions` is empty.
    pub fn new(permissions: &[Permission]) -> Result<Self, ValidationError> {
        if permissions.is_empty() {
            return Err(ValidationError::Empty {
                field: "permissions",
            });
        }
        Ok(Self(permissions.iter().fold(0, |acc, p| acc | p.bit())))
    }

    /// Create, modify and delete.
    pub const fn all() -> Self {
        Self(1 | 2 | 4)
    }

    /// The wire bitmask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }
}

impl From<Permission> for Permissions {
    fn from(permission: Permission) -> Self {
        Self(permission.bit())
    }
}

impl FromStr for Permissions {
    type Err = ValidationError;

    /// Parses a comma-separated list such as `create,modify`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Permission>, _>>()?;
        Self::new(&parsed)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Permission::Create, "create"),
            (Permission::Modify, "modify"),
            (Permission::Delete, "delete"),
        ]
        .into_iter()
        .filter(|(p, _)| self.contains(*p))
        .map(|(_, name)| name)
        .collect();
        f.write_str(&names.join(","))
    }
}

/// Thumbnail dimensions, rendered as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbSize {
    width: u32,
    height: u32,
}

impl ThumbSize {
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] unless `width` is in
    /// `16..=2048` and `height` in `16..=1024`.
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            width: crate::error::require_range("width", width, 16, 2048)?,
            height: crate::error::require_range("height", height, 16, 1024)?,
        })
    }

    pub const fn width(self) -> u32 {
        self.width
    }

    pub const fn height(self) -> u32 {
        self.height
    }
}

impl fmt::Display for ThumbSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Either a file or a folder, for endpoints that accept exactly one of the
/// two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    File(u64),
    Folder(u64),
}

impl Item {
    pub(crate) fn push_to(self, params: &mut Params) {
        match self {
            Self::File(id) => params.push_u64("fileid", id),
            Self::Folder(id) => params.push_u64("folderid", id),
        };
    }
}

/// A virtual subtree for archive operations.
///
/// At least one folder or file id is required; exclusions are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    folderids: Vec<u64>,
    fileids: Vec<u64>,
    excludefolderids: Vec<u64>,
    excludefileids: Vec<u64>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes folders, with all of their contents.
    #[must_use]
    pub fn folders(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.folderids.extend(ids);
        self
    }

    #[must_use]
    pub fn files(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.fileids.extend(ids);
        self
    }

    #[must_use]
    pub fn exclude_folders(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.excludefolderids.extend(ids);
        self
    }

    #[must_use]
    pub fn exclude_files(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.excludefileids.extend(ids);
        self
    }

    /// Returns `true` if nothing is included.
    pub fn is_empty(&self) -> bool {
        self.folderids.is_empty() && self.fileids.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Err(ValidationError::Empty { field: "tree" })
        } else {
            Ok(())
        }
    }

    pub(crate) fn push_to(&self, params: &mut Params) {
        params
            .push_ids("folderids", &self.folderids)
            .push_ids("fileids", &self.fileids)
            .push_ids("excludefolderids", &self.excludefolderids)
            .push_ids("excludefileids", &self.excludefileids);
    }
}

/// What to do when an extracted file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OverwriteMode {
    #[default]
    Rename,
    Overwrite,
    Skip,
}

impl OverwriteMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rename => "rename",
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
        }
    }
}

/// Ensures an archive filename ends in `.zip`.
pub(crate) fn require_zip_name(filename: &str) -> Result<(), ValidationError> {
    crate::error::require_text("filename", filename)?;
    if filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("zip"))
    {
        Ok(())
    } else {
        Err(ValidationError::Invalid {
            field: "filename",
            reason: "must end in .zip",
        })
    }
}
