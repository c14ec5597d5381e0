use crate::error::Diagnostics;
use crate::types::FieldSpec;
use crate::utils::quote;
use fieldwire_schema::RESERVED_TAG_RANGE;
use std::collections::HashSet;

/// Assign one field number per field, in input order.
///
/// Explicit tags are kept verbatim. Auto-assigned tags come from a running
/// counter starting at 1 that skips every number already taken, the
/// protobuf reserved range, and the schema's reservation list; the counter
/// is never reset between fields. The output is a pure function of the
/// field order and the reserved/explicit inputs, which keeps wire tags
/// stable across regenerations.
pub fn allocate(fields: &[FieldSpec], reserved: &[u32]) -> Vec<u32> {
    let reserved: HashSet<u32> = reserved.iter().copied().collect();
    let mut used: HashSet<u32> = HashSet::new();

    for field in fields {
        if let Some(tag) = field.explicit_tag {
            used.insert(tag);
        }
    }

    let mut counter: u32 = 1;
    fields
        .iter()
        .map(|field| match field.explicit_tag {
            Some(tag) => tag,
            None => {
                while used.contains(&counter)
                    || RESERVED_TAG_RANGE.contains(&counter)
                    || reserved.contains(&counter)
                {
                    counter += 1;
                }
                used.insert(counter);
                counter
            }
        })
        .collect()
}

/// Cross-validate explicit tags against each other and against the
/// reservation inputs. The original system accepted duplicate and reserved
/// explicit tags silently; both corrupt the wire contract, so they are
/// fatal here.
pub fn check_explicit_tags(fields: &[FieldSpec], reserved: &[u32], diagnostics: &mut Diagnostics) {
    let mut seen: HashSet<u32> = HashSet::new();

    for field in fields {
        let tag = match field.explicit_tag {
            Some(tag) => tag,
            None => continue,
        };

        if !seen.insert(tag) {
            diagnostics.fatal(
                field.line,
                field.column,
                format!("The field number {} of field {} is used twice", tag, quote(&field.name)),
            );
        }
        if RESERVED_TAG_RANGE.contains(&tag) {
            diagnostics.fatal(
                field.line,
                field.column,
                format!(
                    "The field number {} of field {} falls in the reserved range {}-{}",
                    tag,
                    quote(&field.name),
                    RESERVED_TAG_RANGE.start(),
                    RESERVED_TAG_RANGE.end()
                ),
            );
        } else if reserved.contains(&tag) {
            diagnostics.fatal(
                field.line,
                field.column,
                format!(
                    "The field number {} of field {} is declared reserved",
                    tag,
                    quote(&field.name)
                ),
            );
        }
    }
}
