//! Dotted-path access into BSON documents (`info.visits` reaches into the
//! `info` subdocument). Shared by filtering, updates, indexing, and
//! aggregation expressions.

use bson::{Bson, Document as BsonDocument};

/// Paths deeper than this are treated as missing.
pub const MAX_PATH_SEGMENTS: usize = 32;

pub fn get<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() {
        return None;
    }
    let mut cur = doc;
    let mut segs = path.splitn(MAX_PATH_SEGMENTS + 1, '.').peekable();
    while let Some(seg) = segs.next() {
        if segs.peek().is_none() {
            return cur.get(seg);
        }
        match cur.get(seg) {
            Some(Bson::Document(d)) => cur = d,
            _ => return None,
        }
    }
    None
}

/// Writes `value` at `path`, materializing intermediate subdocuments.
/// Returns whether the document actually changed.
pub fn set(doc: &mut BsonDocument, path: &str, value: Bson) -> bool {
    let (parent, leaf) = descend_to_parent(doc, path);
    let old = parent.insert(leaf, value.clone());
    old.as_ref() != Some(&value)
}

/// Removes the value at `path`. Returns whether anything was removed.
pub fn unset(doc: &mut BsonDocument, path: &str) -> bool {
    let (parent, leaf) = descend_to_parent(doc, path);
    parent.remove(&leaf).is_some()
}

fn descend_to_parent<'a>(doc: &'a mut BsonDocument, path: &str) -> (&'a mut BsonDocument, String) {
    let mut cur = doc;
    let mut segs = path.split('.').peekable();
    let mut leaf = String::new();
    while let Some(seg) = segs.next() {
        if segs.peek().is_none() {
            leaf = seg.to_string();
            break;
        }
        // Non-document intermediates are overwritten, matching $set semantics.
        let replace = !matches!(cur.get(seg), Some(Bson::Document(_)));
        if replace {
            cur.insert(seg.to_string(), Bson::Document(BsonDocument::new()));
        }
        cur = match cur.get_mut(seg) {
            Some(Bson::Document(d)) => d,
            _ => unreachable!("subdocument was just inserted"),
        };
    }
    (cur, leaf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn get_nested() {
        let d = doc! {"a": {"b": {"c": 7}}};
        assert_eq!(get(&d, "a.b.c"), Some(&Bson::Int32(7)));
        assert_eq!(get(&d, "a.b.missing"), None);
        assert_eq!(get(&d, ""), None);
    }

    #[test]
    fn set_creates_intermediates() {
        let mut d = doc! {};
        assert!(set(&mut d, "a.b", Bson::Int32(1)));
        assert_eq!(get(&d, "a.b"), Some(&Bson::Int32(1)));
        // setting the same value again is not a change
        assert!(!set(&mut d, "a.b", Bson::Int32(1)));
    }

    #[test]
    fn unset_leaf() {
        let mut d = doc! {"a": {"b": 1}, "x": 2};
        assert!(unset(&mut d, "a.b"));
        assert!(!unset(&mut d, "a.b"));
        assert_eq!(get(&d, "x"), Some(&Bson::Int32(2)));
    }
}
