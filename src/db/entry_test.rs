use super::*;

#[test]
fn test_entry_new() {
    let entry = Entry::new(Id(1), "akey");
    assert_eq!(entry.to_id(), Id(1));
    assert_eq!(entry.as_key(), "akey");
    assert!(entry.has_key("akey"));
    assert!(!entry.has_key("akeY"));
    assert!(entry.is_simple());
    assert!(entry.is_empty());
    assert_eq!(entry.len(), 0);
    assert!(entry.as_forward().is_empty());
    assert!(entry.as_backward().is_empty());
}

#[test]
fn test_entry_key_limit() {
    let entry = Entry::new(Id(1), "aaaaaaaaaaaaaaaaaaaa");
    assert_eq!(entry.as_key(), "aaaaaaaaaaaaaaa");
    assert_eq!(entry.as_key().chars().count(), KEY_LIMIT);

    let entry = Entry::new(Id(2), "short");
    assert_eq!(entry.as_key(), "short");
}

#[test]
fn test_entry_simple() {
    let mut entry = Entry::new(Id(1), "akey");
    entry.elements.push(Element::of_int(10));
    assert!(entry.is_simple());
    assert_eq!(entry.len(), 1);

    entry.elements.push(Element::of_ref(Id(2)));
    entry.forward.push(Id(2));
    assert!(!entry.is_simple());
    assert_eq!(entry.len(), 2);
}
