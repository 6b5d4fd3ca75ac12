//! Documents and their page trees.

use crate::object::keys::*;
use crate::object::{Array, Dict, Name, ObjRef, Object};
use crate::xref::XRef;
use kurbo::Rect;
use log::warn;
use rustc_hash::FxHashSet;
use thiserror::Error;

// US Letter, used if neither the page nor its ancestors have a media box.
const DEFAULT_MEDIA_BOX: Rect = Rect::new(0.0, 0.0, 612.0, 792.0);
const MAX_TREE_DEPTH: u32 = 64;

/// An error that occurred while loading a document.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// No objects could be found in the file.
    #[error("the file doesn't contain any objects")]
    NoObjects,
    /// The document catalog is missing.
    #[error("the document catalog is missing")]
    MissingCatalog,
    /// The page tree is missing or broken.
    #[error("the page tree is missing")]
    MissingPageTree,
    /// The document is encrypted.
    #[error("encrypted documents are not supported")]
    Encrypted,
}

/// A page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBox {
    /// The media box.
    MediaBox,
    /// The crop box.
    CropBox,
    /// The bleed box.
    BleedBox,
    /// The trim box.
    TrimBox,
    /// The art box.
    ArtBox,
}

/// A PDF document.
#[derive(Debug, Clone)]
pub struct Document {
    xref: XRef,
    pages: Vec<Page>,
}

impl Document {
    /// Load a document from the bytes of a PDF file.
    pub fn load(data: &[u8]) -> Result<Self, LoadError> {
        Self::from_xref(XRef::load(data)?)
    }

    /// Create a document from an object store that already has a trailer.
    pub fn from_xref(xref: XRef) -> Result<Self, LoadError> {
        let root = xref.root().ok_or(LoadError::MissingCatalog)?;
        let pages_ref = root.get_raw(PAGES).ok_or(LoadError::MissingPageTree)?;
        let pages_dict = xref
            .resolve(pages_ref)
            .as_dict()
            .cloned()
            .ok_or(LoadError::MissingPageTree)?;

        let mut pages = vec![];
        let mut visited = FxHashSet::default();

        if let Object::Ref(id) = pages_ref {
            visited.insert(*id);
        }

        collect_pages(
            &xref,
            &pages_dict,
            &Inherited::default(),
            &mut visited,
            &mut pages,
            0,
        );

        Ok(Self { xref, pages })
    }

    /// The object store of the document.
    pub fn xref(&self) -> &XRef {
        &self.xref
    }

    /// The pages of the document.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

#[derive(Default, Clone)]
struct Inherited {
    resources: Option<Dict>,
    media_box: Option<Rect>,
    crop_box: Option<Rect>,
    rotate: Option<i32>,
}

impl Inherited {
    fn update(&self, dict: &Dict, xref: &XRef) -> Self {
        Self {
            resources: dict.get(RESOURCES, xref).or_else(|| self.resources.clone()),
            media_box: dict.get(MEDIA_BOX, xref).or(self.media_box),
            crop_box: dict.get(CROP_BOX, xref).or(self.crop_box),
            rotate: dict.get(ROTATE, xref).or(self.rotate),
        }
    }
}

fn collect_pages(
    xref: &XRef,
    node: &Dict,
    inherited: &Inherited,
    visited: &mut FxHashSet<ObjRef>,
    pages: &mut Vec<Page>,
    depth: u32,
) {
    if depth > MAX_TREE_DEPTH {
        warn!("page tree is too deep");

        return;
    }

    let inherited = inherited.update(node, xref);

    let Some(kids) = node.get::<Array>(KIDS, xref) else {
        warn!("page tree node has no kids");

        return;
    };

    for kid in kids.iter() {
        if let Object::Ref(id) = kid
            && !visited.insert(*id)
        {
            warn!("page tree contains a cycle at {id}");

            continue;
        }

        let Some(dict) = xref.resolve(kid).as_dict().cloned() else {
            continue;
        };

        let is_leaf = match dict.get::<Name>(TYPE, xref) {
            Some(t) => t == PAGE,
            // Some writers omit the type, so guess based on the structure.
            None => !dict.contains_key(KIDS),
        };

        if is_leaf {
            pages.push(Page::new(dict, &inherited, xref));
        } else {
            collect_pages(xref, &dict, &inherited, visited, pages, depth + 1);
        }
    }
}

/// A page of a document, with inherited attributes already applied.
#[derive(Debug, Clone)]
pub struct Page {
    dict: Dict,
    resources: Dict,
    media_box: Rect,
    crop_box: Rect,
    bleed_box: Rect,
    trim_box: Rect,
    art_box: Rect,
    rotation: u32,
    contents: Object,
}

impl Page {
    fn new(dict: Dict, inherited: &Inherited, xref: &XRef) -> Self {
        let inherited = inherited.update(&dict, xref);

        let media_box = inherited
            .media_box
            .filter(|r| r.area() > 0.0)
            .unwrap_or(DEFAULT_MEDIA_BOX);
        let crop_box = inherited
            .crop_box
            .map(|r| r.intersect(media_box))
            .filter(|r| r.area() > 0.0)
            .unwrap_or(media_box);
        let other_box = |key| {
            dict.get::<Rect>(key, xref)
                .map(|r| r.intersect(crop_box))
                .filter(|r| r.area() > 0.0)
                .unwrap_or(crop_box)
        };

        let rotation = inherited.rotate.unwrap_or(0).rem_euclid(360);
        // Only multiples of 90 are allowed, round anything else.
        let rotation = ((rotation + 45) / 90 * 90 % 360) as u32;

        Self {
            resources: inherited.resources.clone().unwrap_or_default(),
            media_box,
            crop_box,
            bleed_box: other_box(BLEED_BOX),
            trim_box: other_box(TRIM_BOX),
            art_box: other_box(ART_BOX),
            rotation,
            contents: dict
                .get_raw(CONTENTS)
                .map(|c| xref.resolve(c))
                .unwrap_or_default(),
            dict,
        }
    }

    /// The raw page dictionary.
    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    /// The resources of the page.
    pub fn resources(&self) -> &Dict {
        &self.resources
    }

    /// The media box of the page.
    pub fn media_box(&self) -> Rect {
        self.media_box
    }

    /// The crop box of the page, defaulting to the media box.
    pub fn crop_box(&self) -> Rect {
        self.crop_box
    }

    /// A page boundary. Bleed, trim and art box default to the crop box.
    pub fn page_box(&self, which: PageBox) -> Rect {
        match which {
            PageBox::MediaBox => self.media_box,
            PageBox::CropBox => self.crop_box,
            PageBox::BleedBox => self.bleed_box,
            PageBox::TrimBox => self.trim_box,
            PageBox::ArtBox => self.art_box,
        }
    }

    /// The rotation of the page in degrees, one of 0, 90, 180 and 270.
    pub fn rotation(&self) -> u32 {
        self.rotation
    }

    /// The contents of the page: a stream, an array of streams, or null.
    pub fn contents(&self) -> &Object {
        &self.contents
    }
}
