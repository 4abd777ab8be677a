// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping elements by property value and ordering the groups.
//!
//! Group keys are ordered "naturally": the first number in each key decides,
//! so `"Station 2"` comes before `"Station 10"`. Keys without a number go
//! last, alphabetically.

use std::cmp::Ordering;
use std::rc::Rc;
use std::sync::Arc;

use sustainer_model::{group_ordered, Entity, PropertyKey, UNSPECIFIED};

/// Anything that can be grouped into a tree.
pub trait Groupable {
    /// Value of a property, `None` if missing or unset.
    fn property_value(&self, key: &PropertyKey) -> Option<&str>;

    /// Name used for the leaf node of this element.
    fn display_name(&self) -> &str;
}

impl Groupable for Entity {
    fn property_value(&self, key: &PropertyKey) -> Option<&str> {
        self.property(key)
    }

    fn display_name(&self) -> &str {
        self.name()
    }
}

impl<G: Groupable + ?Sized> Groupable for &G {
    fn property_value(&self, key: &PropertyKey) -> Option<&str> {
        (**self).property_value(key)
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}

impl<G: Groupable + ?Sized> Groupable for Arc<G> {
    fn property_value(&self, key: &PropertyKey) -> Option<&str> {
        (**self).property_value(key)
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}

impl<G: Groupable + ?Sized> Groupable for Rc<G> {
    fn property_value(&self, key: &PropertyKey) -> Option<&str> {
        (**self).property_value(key)
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}

/// Groups elements by the value of `key`, first-seen order.
///
/// Elements without a value land in the [`UNSPECIFIED`] bucket.
pub fn group_elements_by_property<T>(elements: &[T], key: &PropertyKey) -> Vec<(String, Vec<T>)>
where
    T: Groupable + Clone,
{
    group_ordered(elements.iter().cloned(), |e| {
        e.property_value(key)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNSPECIFIED)
            .to_string()
    })
}

/// Sorts groups by key in natural order. The sort is stable.
pub fn sort_grouped_elements<T>(mut groups: Vec<(String, Vec<T>)>) -> Vec<(String, Vec<T>)> {
    groups.sort_by(|a, b| natural_cmp(&a.0, &b.0));
    groups
}

/// Compares two keys by their first number (integer part, then the digits
/// after the dot read as an integer), then lexicographically.
///
/// Keys without a number compare greater than any key with one.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let na = first_number(a);
    let nb = first_number(b);

    let by_number = match (na, nb) {
        (Some((ai, ad)), Some((bi, bd))) => ai.cmp(&bi).then(ad.cmp(&bd)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_number.then_with(|| a.cmp(b))
}

/// Finds the first `digits[.digits]` run in `s`.
///
/// Runs too long for a `u64` saturate.
fn first_number(s: &str) -> Option<(u64, u64)> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let int_end = digit_run_end(bytes, start);
    let integer = parse_saturating(&bytes[start..int_end]);

    let decimal = match bytes.get(int_end) {
        Some(b'.') => {
            let dec_end = digit_run_end(bytes, int_end + 1);
            if dec_end > int_end + 1 {
                parse_saturating(&bytes[int_end + 1..dec_end])
            } else {
                0
            }
        }
        _ => 0,
    };

    Some((integer, decimal))
}

fn digit_run_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |p| from + p)
}

fn parse_saturating(digits: &[u8]) -> u64 {
    digits.iter().fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sustainer_model::KnownProperty;

    fn sorted(keys: &[&str]) -> Vec<String> {
        let groups: Vec<(String, Vec<()>)> = keys.iter().map(|k| (k.to_string(), vec![])).collect();
        sort_grouped_elements(groups).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn natural_sort_orders_numbers_then_text() {
        assert_eq!(
            sorted(&["2", "10", "1.5", "abc", "1.2"]),
            ["1.2", "1.5", "2", "10", "abc"]
        );
    }

    #[test]
    fn number_anywhere_in_key_counts() {
        assert_eq!(
            sorted(&["Station 10", "Station 2", "Hal", "Station 1"]),
            ["Station 1", "Station 2", "Station 10", "Hal"]
        );
    }

    #[test]
    fn keys_without_numbers_sort_alphabetically_last() {
        assert_eq!(
            sorted(&["zeta", "Unspecified", "alpha", "3"]),
            ["3", "Unspecified", "alpha", "zeta"]
        );
    }

    #[test]
    fn decimal_part_compares_as_integer() {
        // "1.10" has decimal part 10, which is greater than 9.
        assert_eq!(sorted(&["1.10", "1.9"]), ["1.9", "1.10"]);
    }

    #[test]
    fn equal_numbers_fall_back_to_text() {
        assert_eq!(sorted(&["b2", "a2"]), ["a2", "b2"]);
        assert_eq!(natural_cmp("x", "x"), Ordering::Equal);
    }

    #[test]
    fn huge_numbers_saturate() {
        assert_eq!(first_number("99999999999999999999999"), Some((u64::MAX, 0)));
        assert_eq!(first_number("v1."), Some((1, 0)));
        assert_eq!(first_number("none"), None);
    }

    #[test]
    fn groups_by_property_with_unspecified_bucket() {
        let elements = vec![
            Entity::builder("a", 1).property("Station", "2").build().unwrap(),
            Entity::builder("b", 2).build().unwrap(),
            Entity::builder("c", 3).property("Station", "1").build().unwrap(),
            Entity::builder("d", 4).property("Station", "2").build().unwrap(),
        ];
        let groups = group_elements_by_property(&elements, &KnownProperty::Station.into());
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["2", UNSPECIFIED, "1"]);
        let ids: Vec<&str> = groups[0].1.iter().map(|e| e.global_id()).collect();
        assert_eq!(ids, ["a", "d"]);
    }
}
