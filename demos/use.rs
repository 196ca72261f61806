use avl_ordered_set::plane::{Line, Point};
use avl_ordered_set::AvlTreeSet;

fn main() {
    let mut set = AvlTreeSet::new();
    for x in [5, 3, 8, 1, 4, 7, 9] {
        set.insert(x);
    }
    set.insert(4);
    assert!(set.contains(&1));
    set.remove(&1);
    assert!(!set.contains(&1));

    print!("{{ ");
    for x in &set {
        print!("{x}, ");
    }
    println!("}}");

    if let Some(x) = set.upper_bound(&5).get() {
        println!("smallest value above 5: {x}");
    }
    println!("values below 7: {}", set.rank(&7));

    // Walk backwards from the end
    let mut cursor = set.end();
    cursor.move_prev();
    while let Some(x) = cursor.get() {
        print!("{x} ");
        if cursor == set.begin() {
            break;
        }
        cursor.move_prev();
    }
    println!();

    let a = Line::through(Point::new(0.0, 0.0), Point::new(2.0, 2.0)).expect("distinct points");
    let b = Line::through(Point::new(0.0, 2.0), Point::new(2.0, 0.0)).expect("distinct points");
    println!("lines cross at {:?}", a.intersection(&b));
}
