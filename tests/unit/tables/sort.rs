use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Col {
    Words,
    Turns,
}

#[test]
fn same_key_flips_new_key_resets() {
    let mut s = SortState::new(Col::Words);
    assert_eq!(s.direction, SortDirection::Descending);
    s.toggle(Col::Words);
    assert_eq!(s.direction, SortDirection::Ascending);
    s.toggle(Col::Words);
    assert_eq!(s.direction, SortDirection::Descending);
    s.toggle(Col::Words);
    s.toggle(Col::Turns);
    assert_eq!(s.key, Col::Turns);
    assert_eq!(s.direction, SortDirection::Descending);
}

#[test]
fn direction_orients_comparisons() {
    assert_eq!(SortDirection::Ascending.apply(1.cmp(&2)), Ordering::Less);
    assert_eq!(SortDirection::Descending.apply(1.cmp(&2)), Ordering::Greater);
}
