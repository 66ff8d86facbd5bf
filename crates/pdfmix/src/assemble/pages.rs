//! Page-level attribute lookup.
//!
//! Several page attributes may be set on an ancestor `/Pages` node instead
//! of the page itself. The helpers here walk the `/Parent` chain so callers
//! always see the effective value.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes that a `/Page` may inherit from its ancestors.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// MediaBox used when neither the page nor any ancestor declares one (US Letter).
pub const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Guard against `/Parent` cycles in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Effective geometry of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    /// MediaBox width in points.
    pub width: f64,
    /// MediaBox height in points.
    pub height: f64,
    /// Effective `/Rotate`, normalised to `0..360`.
    pub rotation: i64,
}

impl PageInfo {
    /// Whether the MediaBox is taller than it is wide.
    ///
    /// Existing rotation is not taken into account.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

/// Look up `key` on a page, falling back to its ancestors.
pub fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }

        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }

    None
}

/// Follow a single indirect reference.
pub fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Numeric value of an integer or real object.
pub fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

/// Effective MediaBox of a page as `[llx, lly, urx, ury]`.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f64; 4]> {
    let value = resolve(doc, inherited_attribute(doc, page_id, b"MediaBox")?);
    let Object::Array(items) = value else {
        return None;
    };

    if items.len() != 4 {
        return None;
    }

    let mut rect = [0.0; 4];
    for (slot, item) in rect.iter_mut().zip(items) {
        *slot = number(resolve(doc, item))?;
    }
    Some(rect)
}

/// Effective `/Rotate` of a page in `0..360`; 0 when absent.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .map(|value| resolve(doc, value))
        .and_then(number)
        .map(|degrees| (degrees as i64).rem_euclid(360))
        .unwrap_or(0)
}

/// Collect width, height and rotation for a page.
pub fn page_info(doc: &Document, page_id: ObjectId) -> PageInfo {
    let [llx, lly, urx, ury] = media_box(doc, page_id).unwrap_or(DEFAULT_MEDIA_BOX);

    PageInfo {
        width: (urx - llx).abs(),
        height: (ury - lly).abs(),
        rotation: page_rotation(doc, page_id),
    }
}

/// Check whether a dictionary is a node of the page tree.
pub fn is_page_tree_node(dict: &Dictionary) -> bool {
    match dict.get(b"Type") {
        Ok(Object::Name(name)) => name.as_slice() == b"Page" || name.as_slice() == b"Pages",
        _ => false,
    }
}
