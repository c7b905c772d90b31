use super::*;

#[test]
fn seeded_random_is_deterministic() {
    let mut a = SeededRandom::new(42);
    let mut b = SeededRandom::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn uniform_stays_in_range() {
    let mut rng = SeededRandom::new(7);
    for _ in 0..1000 {
        let v = rng.uniform(-3.0, 5.0);
        assert!((-3.0..5.0).contains(&v));
    }
}

#[test]
fn uniform_on_empty_or_inverted_range_returns_min() {
    let mut rng = SeededRandom::new(1);
    assert_eq!(rng.uniform(2.0, 2.0), 2.0);
    assert_eq!(rng.uniform(3.0, 1.0), 3.0);
}

#[test]
fn shuffle_is_a_permutation() {
    let mut rng = SeededRandom::new(99);
    let mut items: Vec<u32> = (0..20).collect();
    shuffle(&mut items, &mut rng);
    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..20).collect::<Vec<_>>());
}

#[test]
fn shuffle_handles_tiny_slices() {
    let mut rng = SeededRandom::new(0);
    let mut empty: Vec<u8> = vec![];
    shuffle(&mut empty, &mut rng);
    let mut one = vec![5u8];
    shuffle(&mut one, &mut rng);
    assert_eq!(one, vec![5]);
}
