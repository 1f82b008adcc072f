//! HubSpot standard object types and their HubSpot-defined associations.

use crate::{AssociationDefinition, AssociationRegistry, ObjectTypeRegistry, Registry};
use crm_types::AssociationCategory;
use std::sync::{Arc, LazyLock};

/// Standard object type name -> object type id.
const STANDARD_OBJECT_TYPES: &[(&str, &str)] = &[
    ("contact", "0-1"),
    ("company", "0-2"),
    ("deal", "0-3"),
    ("engagement", "0-4"),
    ("ticket", "0-5"),
    ("product", "0-7"),
    ("line_item", "0-8"),
    ("quote", "0-14"),
    ("communication", "0-18"),
    ("feedback_submission", "0-19"),
    ("task", "0-27"),
    ("note", "0-46"),
    ("meeting_event", "0-47"),
    ("call", "0-48"),
    ("email", "0-49"),
    ("marketing_event", "0-54"),
    ("quote_template", "0-64"),
    ("goal_target", "0-74"),
    ("discount", "0-84"),
    ("fee", "0-85"),
    ("tax", "0-86"),
    ("postal_mail", "0-116"),
    ("order", "0-123"),
    ("cart", "0-142"),
];

/// (from, to, label, type id). `None` label is the unlabeled default association.
const STANDARD_ASSOCIATIONS: &[(&str, &str, Option<&str>, u32)] = &[
    ("contact", "company", None, 279),
    ("contact", "company", Some("Primary"), 1),
    ("company", "contact", None, 280),
    ("company", "contact", Some("Primary"), 2),
    ("deal", "contact", None, 3),
    ("contact", "deal", None, 4),
    ("deal", "company", None, 341),
    ("deal", "company", Some("Primary"), 5),
    ("company", "deal", None, 342),
    ("company", "deal", Some("Primary"), 6),
    ("contact", "ticket", None, 15),
    ("ticket", "contact", None, 16),
    ("deal", "line_item", None, 19),
    ("line_item", "deal", None, 20),
    ("company", "ticket", None, 340),
    ("company", "ticket", Some("Primary"), 25),
    ("ticket", "company", None, 339),
    ("ticket", "company", Some("Primary"), 26),
    ("deal", "ticket", None, 27),
    ("ticket", "deal", None, 28),
];

static STANDARD: LazyLock<Arc<Registry>> = LazyLock::new(|| {
    let mut object_types = ObjectTypeRegistry::new();
    for (name, id) in STANDARD_OBJECT_TYPES {
        object_types.insert(*name, *id);
    }

    let mut associations = AssociationRegistry::new();
    for (from, to, label, type_id) in STANDARD_ASSOCIATIONS {
        let mut def = AssociationDefinition::new(*type_id, AssociationCategory::HubspotDefined);
        if let Some(l) = label {
            def = def.labeled(*l);
        }
        associations.insert(*from, *to, crate::association_name(from, to, *label), def);
    }

    Arc::new(Registry::new(object_types, associations))
});

pub(crate) fn standard() -> &'static Arc<Registry> {
    &STANDARD
}
