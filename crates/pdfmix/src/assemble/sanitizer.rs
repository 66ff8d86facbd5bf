//! Metadata removal.
//!
//! Sanitizing rebuilds a document from its pages alone, which already drops
//! the `/Info` dictionary and catalog-level XMP. A second step then removes
//! anything metadata-like that was copied along with the pages: `/Metadata`
//! and `/PieceInfo` entries on pages, form XObjects, images, font
//! descriptors and annotations, and the XMP streams themselves.

use lopdf::{Dictionary, Document, Object};
use tracing::debug;

use crate::assemble::assembler::{DocumentAssembler, SourceSpec};
use crate::error::Result;
use crate::io::reader::SourceDocument;

/// Dictionary keys holding metadata rather than content.
const METADATA_KEYS: [&[u8]; 2] = [b"Metadata", b"PieceInfo"];

/// Strips document metadata while keeping every page.
#[derive(Debug, Clone, Default)]
pub struct MetadataSanitizer {
    assembler: DocumentAssembler,
}

impl MetadataSanitizer {
    /// Create a new sanitizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild `source` without metadata.
    ///
    /// Pages, their order and their rotation are preserved. Sanitizing an
    /// already sanitized document yields the same pages and still no
    /// metadata.
    ///
    /// # Errors
    ///
    /// Fails only if the pages themselves cannot be copied.
    pub fn sanitize(&self, source: &SourceDocument) -> Result<Document> {
        let mut document = self
            .assembler
            .assemble(&[SourceSpec::all(source)])?
            .into_document();

        self.strip_metadata(&mut document);

        debug!(path = %source.path().display(), "sanitized document");
        Ok(document)
    }

    /// Remove metadata structures from a document in place.
    ///
    /// Removes the trailer `/Info`, every XMP stream and every `/Metadata`
    /// or `/PieceInfo` entry at any depth, then drops objects nothing refers
    /// to any more.
    pub fn strip_metadata(&self, doc: &mut Document) {
        if let Ok(info_ref) = doc.trailer.get(b"Info").and_then(Object::as_reference) {
            doc.objects.remove(&info_ref);
        }
        doc.trailer.remove(b"Info");

        doc.objects.retain(|_, object| !is_xmp_stream(object));
        for object in doc.objects.values_mut() {
            strip_object(object);
        }

        doc.prune_objects();
    }

    /// Check whether a document carries `/Info`, an XMP stream, or a
    /// `/Metadata` entry anywhere.
    pub fn has_metadata(&self, doc: &Document) -> bool {
        doc.trailer.has(b"Info")
            || doc
                .objects
                .values()
                .any(|object| is_xmp_stream(object) || carries_metadata(object))
    }
}

/// Whether `object` is an XMP metadata stream.
pub(crate) fn is_xmp_stream(object: &Object) -> bool {
    let Object::Stream(stream) = object else {
        return false;
    };
    let is = |key: &[u8], value: &[u8]| {
        stream
            .dict
            .get(key)
            .and_then(Object::as_name)
            .is_ok_and(|name| name == value)
    };
    is(b"Type", b"Metadata") || is(b"Subtype", b"XML")
}

fn strip_object(object: &mut Object) {
    match object {
        Object::Dictionary(dict) => strip_dictionary(dict),
        Object::Stream(stream) => strip_dictionary(&mut stream.dict),
        Object::Array(items) => items.iter_mut().for_each(strip_object),
        _ => {}
    }
}

fn strip_dictionary(dict: &mut Dictionary) {
    for key in METADATA_KEYS {
        dict.remove(key);
    }
    for (_, value) in dict.iter_mut() {
        strip_object(value);
    }
}

fn carries_metadata(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        Object::Array(items) => return items.iter().any(carries_metadata),
        _ => return false,
    };
    dict.has(b"Metadata") || dict.iter().any(|(_, value)| carries_metadata(value))
}
