use rand::{prelude::random, rngs::StdRng, Rng, SeedableRng};

use super::*;

#[test]
fn test_element() {
    let ele = Element::of_int(10);
    assert!(!ele.is_ref());
    assert_eq!(ele.to_ref_id(), None);

    let ele = Element::of_ref(Id(42));
    assert!(ele.is_ref());
    assert_eq!(ele.to_ref_id(), Some(Id(42)));
}

#[test]
fn test_element_cmp_int() {
    let seed: u64 = random();
    println!("test_element_cmp_int {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    for _i in 0..1000 {
        let (a, b): (i32, i32) = (rng.gen(), rng.gen());
        let (x, y) = (Element::of_int(a), Element::of_int(b));
        assert_eq!(x.cmp_int(&y), a.cmp(&b), "{} {}", a, b);
    }

    let (x, y) = (Element::of_int(10), Element::of_int(10));
    assert_eq!(x.cmp_int(&y), std::cmp::Ordering::Equal);
}
