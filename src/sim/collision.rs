//! Collision detection between axis-aligned boxes
//!
//! Only strictly positive overlap on both axes counts. Boxes that merely
//! share an edge or a corner do not collide.

use super::rect::Rect;

/// Check whether two rectangles overlap with positive area
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Index of the first rectangle in `others` that overlaps `subject`
pub fn first_overlap<'a, I>(subject: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    others.into_iter().position(|other| overlaps(subject, other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_partial() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_overlap_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // a.right == b.left
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        // a.bottom == b.top
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &below));
        assert!(!overlaps(&a, &corner));
    }

    #[test]
    fn test_overlap_on_one_axis_only() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let same_column = Rect::new(2.0, 50.0, 4.0, 4.0);
        let same_row = Rect::new(50.0, 2.0, 4.0, 4.0);
        assert!(!overlaps(&a, &same_column));
        assert!(!overlaps(&a, &same_row));
    }

    #[test]
    fn test_first_overlap_picks_earliest() {
        let player = Rect::new(100.0, 100.0, 40.0, 40.0);
        let others = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(110.0, 90.0, 50.0, 20.0),
            Rect::new(120.0, 120.0, 50.0, 20.0),
        ];
        assert_eq!(first_overlap(&player, &others), Some(1));
        assert_eq!(first_overlap(&player, &others[..1]), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn rect() -> impl Strategy<Value = Rect> {
            (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..200.0, 1.0f32..200.0)
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn overlap_is_symmetric(a in rect(), b in rect()) {
                prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
            }

            #[test]
            fn separated_on_x_never_overlaps(a in rect(), gap in 0.0f32..100.0, y in -500.0f32..500.0, w in 1.0f32..200.0, h in 1.0f32..200.0) {
                let b = Rect::new(a.right() + gap, y, w, h);
                prop_assert!(!overlaps(&a, &b));
            }

            #[test]
            fn separated_on_y_never_overlaps(a in rect(), gap in 0.0f32..100.0, x in -500.0f32..500.0, w in 1.0f32..200.0, h in 1.0f32..200.0) {
                let b = Rect::new(x, a.bottom() + gap, w, h);
                prop_assert!(!overlaps(&a, &b));
            }

            #[test]
            fn shared_interior_point_overlaps(a in rect(), fx in 0.1f32..0.9, fy in 0.1f32..0.9, w in 1.0f32..200.0, h in 1.0f32..200.0) {
                // b's top-left corner sits strictly inside a
                let b = Rect::new(a.left() + a.size.x * fx, a.top() + a.size.y * fy, w, h);
                prop_assert!(overlaps(&a, &b));
            }
        }
    }
}
