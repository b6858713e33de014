// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use minunion_core::{Element, WeightVariable};
use minunion_model::collection::WeightedSetCollection;
use std::collections::{BTreeSet, HashMap};

/// Dense ids for the elements of one collection.
///
/// Ids are handed out in ascending `Ord` order of the elements, so sorting
/// ids sorts the elements they stand for.
#[derive(Debug, Clone)]
pub struct ElementInterner<'c, E: Element> {
    elements: Vec<&'c E>,
    ids: HashMap<&'c E, u32>,
}

impl<'c, E: Element> ElementInterner<'c, E> {
    pub fn from_collection<W: WeightVariable>(collection: &'c WeightedSetCollection<E, W>) -> Self {
        let sorted: BTreeSet<&'c E> = collection.distinct_elements();
        let elements: Vec<&'c E> = sorted.into_iter().collect();
        let ids = elements
            .iter()
            .enumerate()
            .map(|(i, &e)| (e, i as u32))
            .collect();
        Self { elements, ids }
    }

    #[inline]
    pub fn id(&self, element: &E) -> Option<u32> {
        self.ids.get(element).copied()
    }

    #[inline]
    pub fn element(&self, id: u32) -> &'c E {
        self.elements[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_element_order() {
        let c = WeightedSetCollection::<&str, i64>::try_from_pairs([
            (vec!["m", "b"], 1),
            (vec!["z"], 1),
            (vec!["a", "m"], 1),
        ])
        .unwrap();
        let interner = ElementInterner::from_collection(&c);
        assert_eq!(*interner.element(3), "z");
        assert_eq!(interner.id(&"a"), Some(0));
        assert_eq!(interner.id(&"b"), Some(1));
        assert_eq!(interner.id(&"m"), Some(2));
        assert_eq!(interner.id(&"z"), Some(3));
        assert_eq!(*interner.element(2), "m");
        assert_eq!(interner.id(&"q"), None);
    }
}
