//! `vt:array` and `vt:vector` containers.
//!
//! Both containers hold leaf elements of a single base type. A `variant`
//! base type means every child is a `vt:variant` wrapper; the wrapper is
//! removed on decode and added back on encode, so items are stored bare.

use super::element::Element;
use super::error::{Result, VariantError};
use super::kind::{ArrayBaseType, VariantKind, VectorBaseType};
use super::scalar::decode_scalar;
use super::value::Value;
use super::{decode_wrapper, encode_wrapped};

const BASE_TYPE: &str = "baseType";
const SIZE: &str = "size";
const LOWER_BOUNDS: &str = "lBounds";
const UPPER_BOUNDS: &str = "uBounds";

/// Most `Null` slots decode will add past the last child.
const MAX_PADDING: usize = 1 << 16;

/// Decode a `vt:array` element.
///
/// Declared bounds are honoured when both lists parse and agree on the
/// number of dimensions; otherwise the array is zero-based and sized to its
/// children. Slots beyond the last child are `Null`.
pub(crate) fn decode_array<E: Element>(element: &E) -> Result<Value> {
    let base = element
        .attribute(BASE_TYPE)
        .ok_or(VariantError::MissingBaseKind(VariantKind::Array))?;
    let element_kind = ArrayBaseType::parse(base)
        .ok_or_else(|| VariantError::UnsupportedBaseType {
            container: VariantKind::Array,
            base: base.to_string(),
        })?
        .element_kind();

    let mut items = decode_items(element_kind, element)?;

    let declared = parse_bounds(element.attribute(LOWER_BOUNDS), element.attribute(UPPER_BOUNDS))
        .and_then(|bounds| shape_len(&bounds).map(|len| (bounds, len)));
    let bounds = match declared {
        Some((bounds, len)) => {
            fit_items(&mut items, len)?;
            bounds
        },
        None => {
            #[cfg(feature = "logging")]
            log::debug!(
                "array bounds {:?}/{:?} unusable, using zero-based bounds",
                element.attribute(LOWER_BOUNDS),
                element.attribute(UPPER_BOUNDS)
            );
            vec![(0, zero_based_upper(items.len())?)]
        },
    };

    Ok(Value::Array {
        element_kind,
        bounds,
        items,
    })
}

/// Decode a `vt:vector` element.
///
/// A missing `size` is taken from the number of children.
pub(crate) fn decode_vector<E: Element>(element: &E) -> Result<Value> {
    let base = element
        .attribute(BASE_TYPE)
        .ok_or(VariantError::MissingBaseKind(VariantKind::Vector))?;
    let element_kind = VectorBaseType::parse(base)
        .ok_or_else(|| VariantError::UnsupportedBaseType {
            container: VariantKind::Vector,
            base: base.to_string(),
        })?
        .element_kind();

    let mut items = decode_items(element_kind, element)?;

    if let Some(size) = element.attribute(SIZE) {
        let len = atoi_simd::parse::<usize>(size.trim().as_bytes())
            .map_err(|_| VariantError::parse(VariantKind::Vector, size))?;
        fit_items(&mut items, len)?;
    }

    Ok(Value::Vector {
        element_kind,
        items,
    })
}

fn decode_items<E: Element>(element_kind: VariantKind, element: &E) -> Result<Vec<Value>> {
    element
        .child_elements()
        .map(|child| decode_item(element_kind, child))
        .collect()
}

fn decode_item<E: Element>(element_kind: VariantKind, child: &E) -> Result<Value> {
    if child.tag_name() != element_kind.tag_name() {
        return Err(VariantError::UnexpectedElement {
            expected: element_kind,
            found: child.tag_name().to_string(),
        });
    }

    if element_kind == VariantKind::Variant {
        return Ok(match decode_wrapper(child)? {
            Value::Nested(inner) => *inner,
            other => other,
        });
    }
    decode_scalar(element_kind, child.inner_text())
}

/// Pad `items` with `Null` up to `len`.
///
/// More items than `len`, or more than [`MAX_PADDING`] missing ones, is an
/// error.
fn fit_items(items: &mut Vec<Value>, len: usize) -> Result<()> {
    if items.len() > len || len - items.len() > MAX_PADDING {
        return Err(VariantError::ShapeMismatch {
            expected: len,
            found: items.len(),
        });
    }
    items.resize(len, Value::Null);
    Ok(())
}

/// Parse comma-separated bound lists. A missing lower list means all zeros.
fn parse_bounds(lower: Option<&str>, upper: Option<&str>) -> Option<Vec<(i32, i32)>> {
    let upper = parse_bound_list(upper?)?;
    let lower = match lower {
        Some(lower) => parse_bound_list(lower)?,
        None => vec![0; upper.len()],
    };
    if lower.len() != upper.len() {
        return None;
    }
    Some(lower.into_iter().zip(upper).collect())
}

/// Upper bound of a zero-based dimension holding `len` items.
fn zero_based_upper(len: usize) -> Result<i32> {
    i32::try_from(len)
        .map(|n| n - 1)
        .map_err(|_| VariantError::LengthOverflow {
            kind: VariantKind::Array,
            len,
        })
}

/// Items written as children.
///
/// Trailing `Null` slots of a typed container stay implicit: the declared
/// size or bounds still count them and decode pads them back.
fn written_items(element_kind: VariantKind, items: &[Value]) -> &[Value] {
    if element_kind == VariantKind::Variant {
        return items;
    }
    let end = items
        .iter()
        .rposition(|item| !matches!(item, Value::Null))
        .map_or(0, |last| last + 1);
    &items[..end]
}

fn parse_bound_list(list: &str) -> Option<Vec<i32>> {
    list.split(',')
        .map(|part| atoi_simd::parse::<i32>(part.trim().as_bytes()).ok())
        .collect()
}

/// Total element count of a shape, or `None` if any dimension is negative.
fn shape_len(bounds: &[(i32, i32)]) -> Option<usize> {
    bounds.iter().try_fold(1usize, |acc, &(lower, upper)| {
        let dim = i64::from(upper) - i64::from(lower) + 1;
        let dim = usize::try_from(dim).ok()?;
        acc.checked_mul(dim)
    })
}

fn join_bounds(bounds: &[(i32, i32)], pick: impl Fn(&(i32, i32)) -> i32) -> String {
    let mut out = String::new();
    let mut buffer = itoa::Buffer::new();
    for (i, bound) in bounds.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(buffer.format(pick(bound)));
    }
    out
}

/// Encode items as a `vt:array` of `element_kind`.
///
/// Empty `bounds` means one zero-based dimension covering every item.
pub(crate) fn encode_array<E: Element>(
    element_kind: VariantKind,
    bounds: &[(i32, i32)],
    items: &[Value],
    format: Option<&str>,
) -> Result<E> {
    let base = ArrayBaseType::for_kind(element_kind).ok_or_else(|| {
        VariantError::UnsupportedBaseType {
            container: VariantKind::Array,
            base: element_kind.tag_name().to_string(),
        }
    })?;

    let default_bounds;
    let bounds = if bounds.is_empty() {
        default_bounds = [(0, zero_based_upper(items.len())?)];
        &default_bounds[..]
    } else {
        bounds
    };
    let len = shape_len(bounds).ok_or(VariantError::ShapeMismatch {
        expected: 0,
        found: items.len(),
    })?;
    if len != items.len() {
        return Err(VariantError::ShapeMismatch {
            expected: len,
            found: items.len(),
        });
    }

    let mut element = E::make(VariantKind::Array.tag_name(), "");
    element.set_attribute(LOWER_BOUNDS, &join_bounds(bounds, |b| b.0));
    element.set_attribute(UPPER_BOUNDS, &join_bounds(bounds, |b| b.1));
    element.set_attribute(BASE_TYPE, base.as_str());
    for item in written_items(element_kind, items) {
        element.append_child(encode_item(element_kind, item, format)?);
    }
    Ok(element)
}

/// Encode items as a `vt:vector` of `element_kind`.
pub(crate) fn encode_vector<E: Element>(
    element_kind: VariantKind,
    items: &[Value],
    format: Option<&str>,
) -> Result<E> {
    let base = VectorBaseType::for_kind(element_kind).ok_or_else(|| {
        VariantError::UnsupportedBaseType {
            container: VariantKind::Vector,
            base: element_kind.tag_name().to_string(),
        }
    })?;

    let mut element = E::make(VariantKind::Vector.tag_name(), "");
    element.set_attribute(SIZE, itoa::Buffer::new().format(items.len()));
    element.set_attribute(BASE_TYPE, base.as_str());
    for item in written_items(element_kind, items) {
        element.append_child(encode_item(element_kind, item, format)?);
    }
    Ok(element)
}

fn encode_item<E: Element>(element_kind: VariantKind, item: &Value, format: Option<&str>) -> Result<E> {
    if element_kind == VariantKind::Variant {
        encode_wrapped(item, format)
    } else {
        super::encode(element_kind, item, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::variant::element::VariantElement;
    use crate::ooxml::variant::{decode, encode};

    fn leaf(tag: &str, text: &str) -> VariantElement {
        VariantElement::make(tag, text)
    }

    #[test]
    fn test_array_with_explicit_bounds_round_trips() {
        let value = Value::Array {
            element_kind: VariantKind::Int32,
            bounds: vec![(2, 4)],
            items: vec![Value::I32(10), Value::I32(20), Value::I32(30)],
        };

        let element: VariantElement = encode(VariantKind::Array, &value, None).unwrap();
        assert_eq!(element.attribute("lBounds"), Some("2"));
        assert_eq!(element.attribute("uBounds"), Some("4"));
        assert_eq!(element.attribute("baseType"), Some("i4"));
        assert_eq!(element.children().len(), 3);

        assert_eq!(decode(&element).unwrap(), value);
    }

    #[test]
    fn test_multi_dimensional_array() {
        let element = VariantElement::new("array")
            .with_attribute("lBounds", "0,1")
            .with_attribute("uBounds", "1,2")
            .with_attribute("baseType", "bool")
            .with_child(leaf("bool", "true"))
            .with_child(leaf("bool", "false"))
            .with_child(leaf("bool", "true"));

        match decode(&element).unwrap() {
            Value::Array { bounds, items, .. } => {
                assert_eq!(bounds, vec![(0, 1), (1, 2)]);
                assert_eq!(
                    items,
                    vec![Value::Bool(true), Value::Bool(false), Value::Bool(true), Value::Null]
                );
            },
            other => panic!("Expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_inconsistent_bounds_fall_back_to_zero_based() {
        let element = VariantElement::new("array")
            .with_attribute("lBounds", "0,0")
            .with_attribute("uBounds", "5")
            .with_attribute("baseType", "bstr")
            .with_child(leaf("bstr", "a_x005F_b"))
            .with_child(leaf("bstr", "c"));

        assert_eq!(
            decode(&element).unwrap(),
            Value::Array {
                element_kind: VariantKind::BString,
                bounds: vec![(0, 1)],
                items: vec![Value::from("a_b"), Value::from("c")],
            }
        );
    }

    #[test]
    fn test_array_currency_decodes_to_decimal() {
        let element = VariantElement::new("array")
            .with_attribute("uBounds", "0")
            .with_attribute("baseType", "cy")
            .with_child(leaf("cy", "1,25"));

        match decode(&element).unwrap() {
            Value::Array { element_kind, items, .. } => {
                assert_eq!(element_kind, VariantKind::Currency);
                assert_eq!(items, vec![Value::Decimal(rust_decimal::Decimal::new(125, 2))]);
            },
            other => panic!("Expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_array_overflowing_bounds_rejected() {
        let element = VariantElement::new("array")
            .with_attribute("lBounds", "0")
            .with_attribute("uBounds", "0")
            .with_attribute("baseType", "i4")
            .with_child(leaf("i4", "1"))
            .with_child(leaf("i4", "2"));

        assert_eq!(
            decode(&element),
            Err(VariantError::ShapeMismatch {
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn test_missing_base_type() {
        let array = VariantElement::new("array").with_child(leaf("i4", "1"));
        assert_eq!(
            decode(&array),
            Err(VariantError::MissingBaseKind(VariantKind::Array))
        );

        let vector = VariantElement::new("vector").with_attribute("size", "0");
        assert_eq!(
            decode(&vector),
            Err(VariantError::MissingBaseKind(VariantKind::Vector))
        );
    }

    #[test]
    fn test_array_rejects_vector_only_base() {
        let element = VariantElement::new("array")
            .with_attribute("uBounds", "0")
            .with_attribute("baseType", "clsid");
        assert!(matches!(
            decode(&element),
            Err(VariantError::UnsupportedBaseType {
                container: VariantKind::Array,
                ..
            })
        ));
    }

    #[test]
    fn test_vector_of_class_ids() {
        let element = VariantElement::new("vector")
            .with_attribute("size", "1")
            .with_attribute("baseType", "clsid")
            .with_child(leaf("clsid", "{D5CDD505-2E9C-101B-9397-08002B2CF9AE}"));

        match decode(&element).unwrap() {
            Value::Vector { element_kind, items } => {
                assert_eq!(element_kind, VariantKind::ClassId);
                assert!(matches!(items[0], Value::Guid(_)));
            },
            other => panic!("Expected vector, got {other:?}"),
        }
    }

    #[test]
    fn test_vector_size_inferred_and_padded() {
        let inferred = VariantElement::new("vector")
            .with_attribute("baseType", "lpstr")
            .with_child(leaf("lpstr", "a"))
            .with_child(leaf("lpstr", "b"));
        assert_eq!(
            decode(&inferred).unwrap(),
            Value::Vector {
                element_kind: VariantKind::Lpstr,
                items: vec![Value::from("a"), Value::from("b")],
            }
        );

        let padded = inferred.clone().with_attribute("size", "3");
        match decode(&padded).unwrap() {
            Value::Vector { items, .. } => assert_eq!(items[2], Value::Null),
            other => panic!("Expected vector, got {other:?}"),
        }

        let short = inferred.with_attribute("size", "1");
        assert!(matches!(
            decode(&short),
            Err(VariantError::ShapeMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_vector_of_variants_unwraps_each_child() {
        // HeadingPairs layout from docProps/app.xml
        let element = VariantElement::new("vector")
            .with_attribute("size", "2")
            .with_attribute("baseType", "variant")
            .with_child(VariantElement::new("variant").with_child(leaf("lpstr", "Title")))
            .with_child(VariantElement::new("variant").with_child(leaf("i4", "1")));

        assert_eq!(
            decode(&element).unwrap(),
            Value::Vector {
                element_kind: VariantKind::Variant,
                items: vec![Value::from("Title"), Value::I32(1)],
            }
        );
    }

    #[test]
    fn test_variant_vector_rejects_bare_children() {
        let element = VariantElement::new("vector")
            .with_attribute("baseType", "variant")
            .with_child(leaf("i4", "1"));

        assert_eq!(
            decode(&element),
            Err(VariantError::UnexpectedElement {
                expected: VariantKind::Variant,
                found: "i4".to_string(),
            })
        );
    }

    #[test]
    fn test_typed_vector_encode() {
        let value = Value::Vector {
            element_kind: VariantKind::Lpwstr,
            items: vec![Value::from("x"), Value::from("y")],
        };
        let element: VariantElement = encode(VariantKind::Vector, &value, None).unwrap();

        assert_eq!(element.attribute("size"), Some("2"));
        assert_eq!(element.attribute("baseType"), Some("lpwstr"));
        assert!(element.children().iter().all(|c| c.tag_name() == "lpwstr"));
        assert_eq!(decode(&element).unwrap(), value);
    }

    #[test]
    fn test_encode_rejects_shape_mismatch() {
        let value = Value::Array {
            element_kind: VariantKind::Int32,
            bounds: vec![(0, 4)],
            items: vec![Value::I32(1)],
        };
        assert_eq!(
            encode::<VariantElement>(VariantKind::Array, &value, None),
            Err(VariantError::ShapeMismatch {
                expected: 5,
                found: 1,
            })
        );
    }

    #[test]
    fn test_oversized_declarations_rejected() {
        let vector = VariantElement::new("vector")
            .with_attribute("size", "18446744073709551615")
            .with_attribute("baseType", "i4");
        assert_eq!(
            decode(&vector),
            Err(VariantError::ShapeMismatch {
                expected: usize::MAX,
                found: 0,
            })
        );

        let array = VariantElement::new("array")
            .with_attribute("lBounds", "-2147483648")
            .with_attribute("uBounds", "2147483647")
            .with_attribute("baseType", "i4")
            .with_child(leaf("i4", "1"));
        assert!(matches!(
            decode(&array),
            Err(VariantError::ShapeMismatch { found: 1, .. })
        ));

        let just_enough = VariantElement::new("vector")
            .with_attribute("size", "65536")
            .with_attribute("baseType", "i4");
        match decode(&just_enough).unwrap() {
            Value::Vector { items, .. } => assert_eq!(items.len(), MAX_PADDING),
            other => panic!("Expected vector, got {other:?}"),
        }
    }

    #[test]
    fn test_padded_vector_encodes_back() {
        let element = VariantElement::new("vector")
            .with_attribute("size", "3")
            .with_attribute("baseType", "lpstr")
            .with_child(leaf("lpstr", "a"))
            .with_child(leaf("lpstr", "b"));
        let value = decode(&element).unwrap();

        let encoded: VariantElement = encode(VariantKind::Vector, &value, None).unwrap();
        assert_eq!(encoded.attribute("size"), Some("3"));
        assert_eq!(encoded.children().len(), 2);
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_padded_array_encodes_back() {
        let element = VariantElement::new("array")
            .with_attribute("lBounds", "1")
            .with_attribute("uBounds", "4")
            .with_attribute("baseType", "r8")
            .with_child(leaf("r8", "0.5"));
        let value = decode(&element).unwrap();

        let encoded: VariantElement = encode(VariantKind::Array, &value, None).unwrap();
        assert_eq!(encoded.attribute("lBounds"), Some("1"));
        assert_eq!(encoded.attribute("uBounds"), Some("4"));
        assert_eq!(encoded.children().len(), 1);
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_inner_null_in_typed_vector_rejected() {
        let value = Value::Vector {
            element_kind: VariantKind::Int32,
            items: vec![Value::Null, Value::I32(1)],
        };
        assert!(matches!(
            encode::<VariantElement>(VariantKind::Vector, &value, None),
            Err(VariantError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_based_upper_limit() {
        assert_eq!(zero_based_upper(0), Ok(-1));
        assert_eq!(zero_based_upper(3), Ok(2));
        assert_eq!(
            zero_based_upper(i32::MAX as usize + 1),
            Err(VariantError::LengthOverflow {
                kind: VariantKind::Array,
                len: i32::MAX as usize + 1,
            })
        );
    }

    #[test]
    fn test_bounds_parsing() {
        assert_eq!(parse_bounds(Some("1, 2"), Some("3,4")), Some(vec![(1, 3), (2, 4)]));
        assert_eq!(parse_bounds(None, Some("3")), Some(vec![(0, 3)]));
        assert_eq!(parse_bounds(Some("0"), None), None);
        assert_eq!(parse_bounds(Some("a"), Some("1")), None);
        assert_eq!(shape_len(&[(2, 4), (0, 1)]), Some(6));
        assert_eq!(shape_len(&[(0, -1)]), Some(0));
        assert_eq!(shape_len(&[(5, 1)]), None);
    }
}
