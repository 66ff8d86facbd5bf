//! Building a fresh document out of selected source pages.
//!
//! The output is never derived from a clone of a source. A new catalog and a
//! single flat page tree are created, and each selected page is deep-copied
//! into them together with every object it references. Copies are made once
//! per source document, so pages sharing a font or image share the copy too.
//!
//! References that would pull in part of a source page tree (a `/Parent`
//! chain, an annotation pointing at a page that was not selected) are
//! replaced by `null`. Document-level structures such as `/Info`, XMP
//! metadata, outlines and name trees are never carried over.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::debug;

use crate::assemble::pages::{self, DEFAULT_MEDIA_BOX, INHERITABLE_KEYS};
use crate::config::Rotation;
use crate::error::{PdfMixError, Result};
use crate::io::reader::SourceDocument;

/// Number of pages copied between two progress callbacks.
pub const PROGRESS_BATCH: usize = 8;

/// Version written when no source declares one.
const DEFAULT_VERSION: &str = "1.7";

/// Change applied to the output copy of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageTransform {
    /// Copy as is.
    #[default]
    None,
    /// Add a rotation to the page's existing rotation.
    Rotate(Rotation),
    /// Rotate by 90 degrees if the page is portrait.
    Landscape,
}

impl PageTransform {
    /// Final `/Rotate` value for a page with the given geometry.
    pub fn resolve(&self, info: &pages::PageInfo) -> i64 {
        match self {
            Self::None => info.rotation,
            Self::Rotate(rotation) => rotation.compose(info.rotation),
            Self::Landscape if info.is_portrait() => Rotation::Clockwise90.compose(info.rotation),
            Self::Landscape => info.rotation,
        }
    }
}

/// Pages to take from one source document, in output order.
#[derive(Debug, Clone)]
pub struct SourceSpec<'a> {
    document: &'a SourceDocument,
    pages: Vec<(usize, PageTransform)>,
}

impl<'a> SourceSpec<'a> {
    /// Select pages by zero-based index, untransformed.
    pub fn new(document: &'a SourceDocument, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            document,
            pages: indices
                .into_iter()
                .map(|index| (index, PageTransform::None))
                .collect(),
        }
    }

    /// Select every page of the document in order.
    pub fn all(document: &'a SourceDocument) -> Self {
        Self::new(document, 0..document.page_count())
    }

    /// Select nothing yet; pages are added with [`SourceSpec::push`].
    pub fn empty(document: &'a SourceDocument) -> Self {
        Self::new(document, std::iter::empty())
    }

    /// Append one page.
    pub fn push(&mut self, index: usize, transform: PageTransform) {
        self.pages.push((index, transform));
    }

    /// Apply the same transform to every selected page.
    pub fn with_transform(mut self, transform: PageTransform) -> Self {
        for (_, slot) in &mut self.pages {
            *slot = transform;
        }
        self
    }

    /// Rotate only the selected pages whose index is in `targets`.
    pub fn rotate_where(mut self, rotation: Rotation, targets: &[usize]) -> Self {
        for (index, slot) in &mut self.pages {
            if targets.contains(index) {
                *slot = PageTransform::Rotate(rotation);
            }
        }
        self
    }

    /// Source document.
    pub fn document(&self) -> &'a SourceDocument {
        self.document
    }

    /// Selected pages with their transforms.
    pub fn pages(&self) -> &[(usize, PageTransform)] {
        &self.pages
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A newly built document ready to be written.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    document: Document,
    page_count: usize,
}

impl AssembledDocument {
    /// Number of pages in the output.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The assembled document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the assembled document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Assembles output documents from source page selections.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler;

impl DocumentAssembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        Self
    }

    /// Build one document from the given selections, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMixError::EmptySelection`] when no page is selected and
    /// [`PdfMixError::AssemblyFailed`] when a selection refers to a page the
    /// source does not have.
    pub fn assemble(&self, sources: &[SourceSpec<'_>]) -> Result<AssembledDocument> {
        self.assemble_with_progress(sources, |_, _| {})
    }

    /// Like [`assemble`](Self::assemble), reporting `(pages_done, pages_total)`
    /// every [`PROGRESS_BATCH`] pages and once after the last page.
    pub fn assemble_with_progress<F>(
        &self,
        sources: &[SourceSpec<'_>],
        mut on_progress: F,
    ) -> Result<AssembledDocument>
    where
        F: FnMut(usize, usize),
    {
        let version = sources
            .iter()
            .map(|spec| spec.document.version())
            .max()
            .unwrap_or(DEFAULT_VERSION);

        let mut output = Document::with_version(version);
        let pages_id = output.new_object_id();

        // Distinct source documents; a page is identified by (slot, page id).
        let mut documents: Vec<&SourceDocument> = Vec::new();
        let mut page_map: HashMap<(usize, ObjectId), ObjectId> = HashMap::new();
        let mut plan = Vec::new();

        for spec in sources {
            let slot = match documents.iter().position(|d| std::ptr::eq(*d, spec.document)) {
                Some(slot) => slot,
                None => {
                    documents.push(spec.document);
                    documents.len() - 1
                }
            };

            for &(index, transform) in &spec.pages {
                let source_id = spec.document.page_id(index).ok_or_else(|| {
                    PdfMixError::assembly_failed(format!(
                        "page {} requested from {} which has {} pages",
                        index + 1,
                        spec.document.path().display(),
                        spec.document.page_count()
                    ))
                })?;

                let new_id = output.new_object_id();
                page_map.entry((slot, source_id)).or_insert(new_id);
                plan.push((slot, source_id, new_id, transform));
            }
        }

        if plan.is_empty() {
            return Err(PdfMixError::empty_selection("assembly"));
        }

        let total = plan.len();
        let mut copiers: Vec<ObjectCopier<'_>> = documents
            .iter()
            .enumerate()
            .map(|(slot, source)| ObjectCopier::new(slot, source.document()))
            .collect();

        let mut kids = Vec::with_capacity(total);
        for (done, &(slot, source_id, new_id, transform)) in plan.iter().enumerate() {
            let copier = &mut copiers[slot];
            let page = copier.copy_page(source_id, pages_id, transform, &mut output, &page_map)?;
            output.objects.insert(new_id, Object::Dictionary(page));
            kids.push(Object::Reference(new_id));

            let done = done + 1;
            if done % PROGRESS_BATCH == 0 || done == total {
                on_progress(done, total);
            }
        }

        output.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total as i64,
            }),
        );

        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        debug!(
            pages = total,
            sources = documents.len(),
            objects = output.objects.len(),
            "assembled document"
        );

        Ok(AssembledDocument {
            document: output,
            page_count: total,
        })
    }
}

/// Deep-copies objects out of one source document.
struct ObjectCopier<'a> {
    slot: usize,
    source: &'a Document,
    /// Source id to output id for everything copied so far.
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(slot: usize, source: &'a Document) -> Self {
        Self {
            slot,
            source,
            copied: HashMap::new(),
        }
    }

    /// Copy a page dictionary, materialising inherited attributes.
    fn copy_page(
        &mut self,
        page_id: ObjectId,
        parent_id: ObjectId,
        transform: PageTransform,
        output: &mut Document,
        page_map: &HashMap<(usize, ObjectId), ObjectId>,
    ) -> Result<Dictionary> {
        let source_page = self.source.get_dictionary(page_id).map_err(|e| {
            PdfMixError::assembly_failed(format!("page object {page_id:?} is unreadable: {e}"))
        })?;

        let mut page = Dictionary::new();
        for (key, value) in source_page.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            page.set(key.clone(), self.copy(value, output, page_map));
        }

        for key in INHERITABLE_KEYS {
            if page.has(key) || key == b"Rotate" {
                continue;
            }
            if let Some(value) = pages::inherited_attribute(self.source, page_id, key) {
                page.set(key.to_vec(), self.copy(value, output, page_map));
            }
        }

        if !page.has(b"Resources") {
            page.set("Resources", Dictionary::new());
        }
        if !page.has(b"MediaBox") {
            page.set(
                "MediaBox",
                DEFAULT_MEDIA_BOX.iter().map(|&v| Object::Real(v as f32)).collect::<Vec<_>>(),
            );
        }

        let info = pages::page_info(self.source, page_id);
        let rotation = transform.resolve(&info);
        if rotation == 0 {
            page.remove(b"Rotate");
        } else {
            page.set("Rotate", rotation);
        }

        page.set("Type", "Page");
        page.set("Parent", parent_id);

        Ok(page)
    }

    fn copy(
        &mut self,
        object: &Object,
        output: &mut Document,
        page_map: &HashMap<(usize, ObjectId), ObjectId>,
    ) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(*id, output, page_map),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy(item, output, page_map))
                    .collect(),
            ),
            Object::Dictionary(dict) => {
                Object::Dictionary(self.copy_dictionary(dict, output, page_map))
            }
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dictionary(&stream.dict, output, page_map);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(
        &mut self,
        dict: &Dictionary,
        output: &mut Document,
        page_map: &HashMap<(usize, ObjectId), ObjectId>,
    ) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.copy(value, output, page_map));
        }
        copy
    }

    fn copy_reference(
        &mut self,
        id: ObjectId,
        output: &mut Document,
        page_map: &HashMap<(usize, ObjectId), ObjectId>,
    ) -> Object {
        if let Some(&new_id) = page_map.get(&(self.slot, id)) {
            return Object::Reference(new_id);
        }
        if let Some(&new_id) = self.copied.get(&id) {
            return Object::Reference(new_id);
        }

        let Ok(object) = self.source.get_object(id) else {
            return Object::Null;
        };

        if let Object::Dictionary(dict) = object
            && pages::is_page_tree_node(dict)
        {
            return Object::Null;
        }

        // Reserve the id before recursing so cycles resolve to it.
        let new_id = output.new_object_id();
        self.copied.insert(id, new_id);

        let copy = self.copy(object, output, page_map);
        output.objects.insert(new_id, copy);

        Object::Reference(new_id)
    }
}
