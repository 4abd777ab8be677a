// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Excluding element categories from tagging.

use sustainer_model::{Entity, KnownProperty};

use crate::config::TaggerConfig;

/// Result of [`filter_elements`]. Every input element ends up in exactly one
/// of the two lists, in input order.
#[derive(Debug, Default)]
pub struct FilteredElements<'a> {
    pub filtered: Vec<&'a Entity>,
    pub filtered_out: Vec<&'a Entity>,
}

/// Splits `elements` into the ones to tag and the ones hidden by `config`.
///
/// Fasteners and installations are hidden by type substring unless shown.
/// Hidden installations are also matched by product code, since many are
/// modelled with a generic type.
pub fn filter_elements<'a>(elements: &'a [Entity], config: &TaggerConfig) -> FilteredElements<'a> {
    let mut hidden_types: Vec<&str> = Vec::new();
    if !config.show_fasteners {
        hidden_types.push(&config.mergeable_type);
    }
    if !config.show_installations {
        hidden_types.push(&config.installation_type);
    }

    let is_hidden = |e: &Entity| {
        hidden_types.iter().any(|t| e.ifc_type().contains(t))
            || (!config.show_installations
                && e.known(KnownProperty::ProductCode)
                    .is_some_and(|code| code.contains(config.installation_product_code.as_str())))
    };

    let (filtered_out, filtered): (Vec<&Entity>, Vec<&Entity>) = elements.iter().partition(|e| is_hidden(*e));
    FilteredElements {
        filtered,
        filtered_out,
    }
}
