//! Tests for bounding box values and their comment wire format.

use psdsc_core::model::{
    BBox, BoundingBox, BoxComment, Coordinate, DscComment, HiResBoundingBox, Scope,
};

fn reparse<T: Coordinate>(comment: &BoxComment<T>) -> BoxComment<T> {
    let mut parsed = BoxComment::<T>::empty(comment.scope());
    parsed.parse(&comment.generate()).expect("reparse");
    parsed
}

// === Integer and precision laws ===

#[test]
fn test_integer_box_formats_plain_integers() {
    let comment = BoxComment::document(BoundingBox::new(0, 0, 612, 792));
    assert_eq!(comment.generate(), "0 0 612 792");
    assert_eq!(comment.to_line(), "%%BoundingBox: 0 0 612 792");
}

#[test]
fn test_hires_box_trims_trailing_zeros() {
    let comment = BoxComment::document(HiResBoundingBox::new(0.0, 0.0, 612.283, 792.1));
    assert_eq!(comment.generate(), "0 0 612.283 792.1");

    let parsed = reparse(&comment);
    let bbox = parsed.bbox().unwrap();
    assert_eq!(bbox.llx(), 0.0);
    assert_eq!(bbox.lly(), 0.0);
    assert_eq!(bbox.urx(), 612.283);
    assert_eq!(bbox.ury(), 792.1);
}

#[test]
fn test_hires_box_never_uses_exponent() {
    let comment = BoxComment::document(HiResBoundingBox::new(1e-7, -2.5e-3, 1e21, 100.0));
    let text = comment.generate();
    assert_eq!(text, "0.0000001 -0.0025 1000000000000000000000 100");
    assert!(!text.contains('e'));
    assert_eq!(reparse(&comment), comment);
}

#[test]
fn test_hires_box_accepts_exponent_input() {
    let mut comment = BoxComment::<f64>::empty(Scope::Document);
    comment.parse("0 0 6.12e2 .5").unwrap();
    assert_eq!(comment.bbox(), Some(HiResBoundingBox::new(0.0, 0.0, 612.0, 0.5)));
    assert_eq!(comment.generate(), "0 0 612 0.5");
}

// === Round-trip law ===

#[test]
fn test_round_trip_integer_boxes() {
    let boxes = [
        BoundingBox::new(0, 0, 612, 792),
        BoundingBox::new(-72, -36, 540, 756),
        BoundingBox::new(10, 10, 10, 10),
        BoundingBox::new(100, 100, 0, 0),
        BoundingBox::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX),
    ];
    for bbox in boxes {
        for scope in [Scope::Document, Scope::Page] {
            let comment = BoxComment::new(scope, bbox);
            assert_eq!(reparse(&comment), comment, "{bbox}");
        }
    }
}

#[test]
fn test_round_trip_hires_boxes() {
    let boxes = [
        HiResBoundingBox::new(0.0, 0.0, 612.283, 792.1),
        HiResBoundingBox::new(-0.5, -1234.125, 0.1, 0.2),
        HiResBoundingBox::new(1.0 / 3.0, 2.0 / 3.0, 1.0 / 7.0, 0.1 + 0.2),
        HiResBoundingBox::new(5.5, 5.5, 5.5, 5.5),
    ];
    for bbox in boxes {
        for scope in [Scope::Document, Scope::Page] {
            let comment = BoxComment::new(scope, bbox);
            assert_eq!(reparse(&comment), comment, "{bbox}");
        }
    }
}

#[test]
fn test_atend_round_trips() {
    let comment = BoxComment::<i32>::at_end(Scope::Document);
    assert_eq!(comment.generate(), "(atend)");
    assert!(comment.is_deferred());
    assert!(comment.is_valid());
    assert_eq!(reparse(&comment), comment);
}

// === Malformed arguments ===

#[test]
fn test_integer_box_rejects_bad_arguments() {
    for bad in ["a b c", "0 0 612", "0 0 612 792 1", "0 0 612.5 792", "", "(atend"] {
        let mut comment = BoxComment::<i32>::empty(Scope::Document);
        assert!(comment.parse(bad).is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn test_hires_box_rejects_non_numbers() {
    for bad in ["0 0 nan 1", "0 0 inf 1", "0 0 1,5 1", "0 0 1 x"] {
        let mut comment = BoxComment::<f64>::empty(Scope::Page);
        assert!(comment.parse(bad).is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn test_error_names_the_keyword() {
    let mut comment = BoxComment::<f64>::empty(Scope::Page);
    let err = comment.parse("1 2").unwrap_err();
    assert_eq!(
        err.to_string(),
        "malformed arguments for %%PageHiResBoundingBox: expected 4 coordinates, found 2"
    );
}

// === Geometry ===

#[test]
fn test_degenerate_boxes_are_accepted() {
    let empty = BoundingBox::new(10, 10, 10, 20);
    assert!(empty.is_empty());
    assert!(empty.is_normalized());
    assert_eq!(empty.width(), 0.0);

    let flipped = BoundingBox::new(100, 100, 0, 0);
    assert!(!flipped.is_normalized());
    assert!(BoxComment::document(flipped).is_valid());
}

#[test]
fn test_non_finite_hires_box_is_invalid() {
    let comment = BoxComment::document(HiResBoundingBox::new(0.0, 0.0, f64::NAN, 1.0));
    assert!(!comment.is_valid());
    let comment = BoxComment::document(HiResBoundingBox::new(0.0, 0.0, 1.0, 1.0));
    assert!(comment.is_valid());
}

#[test]
fn test_enclosing_integer_box() {
    let hires = HiResBoundingBox::new(-0.5, 0.25, 611.1, 792.0);
    assert_eq!(hires.enclosing(), BoundingBox::new(-1, 0, 612, 792));
}

#[test]
fn test_integer_box_widens_to_hires() {
    let hires: HiResBoundingBox = BoundingBox::new(1, 2, 3, 4).into();
    assert_eq!(hires, BBox::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(hires.as_rect(), (1.0, 2.0, 3.0, 4.0));
}
