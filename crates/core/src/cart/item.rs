//! Cart Items

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A selected font license waiting in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Font identifier
    pub font_id: String,

    /// Slug of the typeface the font belongs to
    pub typeface_slug: String,

    /// Identifier of the selling studio
    pub studio_id: String,

    /// Slug of the selling studio
    pub studio_slug: String,

    /// Price in minor currency units
    pub price: u64,
}

impl CartItem {
    /// Returns the identity key of this selection.
    pub fn key(&self) -> CartItemKey {
        CartItemKey {
            font_id: self.font_id.clone(),
            typeface_slug: self.typeface_slug.clone(),
            studio_id: self.studio_id.clone(),
            studio_slug: self.studio_slug.clone(),
        }
    }

    /// Returns true when `other` is the same selection, ignoring price.
    pub fn same_selection(&self, other: &CartItem) -> bool {
        self.font_id == other.font_id
            && self.typeface_slug == other.typeface_slug
            && self.studio_id == other.studio_id
            && self.studio_slug == other.studio_slug
    }

    /// Returns true when this item is identified by `key`.
    pub fn matches(&self, key: &CartItemKey) -> bool {
        self.font_id == key.font_id
            && self.typeface_slug == key.typeface_slug
            && self.studio_id == key.studio_id
            && self.studio_slug == key.studio_slug
    }
}

/// Composite identity of a cart selection.
///
/// Two items with equal keys are the same selection regardless of price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartItemKey {
    /// Font identifier
    pub font_id: String,

    /// Typeface slug
    pub typeface_slug: String,

    /// Studio identifier
    pub studio_id: String,

    /// Studio slug
    pub studio_slug: String,
}

impl CartItemKey {
    /// Build a key from its four parts.
    pub fn new(
        font_id: impl Into<String>,
        typeface_slug: impl Into<String>,
        studio_id: impl Into<String>,
        studio_slug: impl Into<String>,
    ) -> Self {
        Self {
            font_id: font_id.into(),
            typeface_slug: typeface_slug.into(),
            studio_id: studio_id.into(),
            studio_slug: studio_slug.into(),
        }
    }
}

/// Errors raised when parsing a key from its display form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartItemKeyError {
    /// The key did not have four `:`-separated parts.
    #[error("cart item key must look like studioId:studioSlug:typefaceSlug:fontId")]
    InvalidFormat,

    /// A `%` was not followed by `25` or `3A`.
    #[error("cart item key has an invalid escape sequence")]
    InvalidEscape,
}

/// Writes `part` with `%` as `%25` and `:` as `%3A`.
fn write_escaped(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    for c in part.chars() {
        match c {
            '%' => f.write_str("%25")?,
            ':' => f.write_str("%3A")?,
            _ => fmt::Write::write_char(f, c)?,
        }
    }

    Ok(())
}

fn unescape(part: &str) -> Result<String, CartItemKeyError> {
    let mut unescaped = String::with_capacity(part.len());
    let mut chars = part.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            unescaped.push(c);

            continue;
        }

        match (chars.next(), chars.next()) {
            (Some('2'), Some('5')) => unescaped.push('%'),
            (Some('3'), Some('A')) => unescaped.push(':'),
            _ => return Err(CartItemKeyError::InvalidEscape),
        }
    }

    Ok(unescaped)
}

/// `studioId:studioSlug:typefaceSlug:fontId`, each part escaped so that
/// parsing the output gives back the same key.
impl fmt::Display for CartItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, &self.studio_id)?;
        f.write_str(":")?;
        write_escaped(f, &self.studio_slug)?;
        f.write_str(":")?;
        write_escaped(f, &self.typeface_slug)?;
        f.write_str(":")?;
        write_escaped(f, &self.font_id)
    }
}

impl FromStr for CartItemKey {
    type Err = CartItemKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(':');

        let studio_id = parts.next().ok_or(CartItemKeyError::InvalidFormat)?;
        let studio_slug = parts.next().ok_or(CartItemKeyError::InvalidFormat)?;
        let typeface_slug = parts.next().ok_or(CartItemKeyError::InvalidFormat)?;
        let font_id = parts.next().ok_or(CartItemKeyError::InvalidFormat)?;

        if parts.next().is_some()
            || [studio_id, studio_slug, typeface_slug, font_id]
                .iter()
                .any(|part| part.is_empty())
        {
            return Err(CartItemKeyError::InvalidFormat);
        }

        Ok(Self::new(
            unescape(font_id)?,
            unescape(typeface_slug)?,
            unescape(studio_id)?,
            unescape(studio_slug)?,
        ))
    }
}
