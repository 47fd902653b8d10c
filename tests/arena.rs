//! Integration tests for nearlyc-common arenas.

use std::cell::RefCell;
use std::rc::Rc;

use nearlyc_common::{AnyArena, Arena, BasicArena, ChunkedArena};

struct Tracked {
    id: usize,
    log: Rc<RefCell<Vec<usize>>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.id);
    }
}

fn destroy_order(mut arena: impl Arena, n: usize) -> Vec<usize> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for id in 0..n {
        arena.create(Tracked {
            id,
            log: Rc::clone(&log),
        });
    }
    assert_eq!(arena.object_count(), n);
    assert!(log.borrow().is_empty());
    drop(arena);
    let order = log.borrow().clone();
    order
}

#[test]
fn test_every_object_destroyed_once_in_creation_order() {
    let expected: Vec<usize> = (0..50).collect();
    assert_eq!(destroy_order(BasicArena::new(), 50), expected);
    assert_eq!(destroy_order(ChunkedArena::with_initial_size(64), 50), expected);
    assert_eq!(
        destroy_order(AnyArena::from(ChunkedArena::new()), 50),
        expected
    );
}

#[test]
fn test_chunked_growth_doubles_cumulative_capacity() {
    let mut arena = ChunkedArena::with_initial_size(1000);
    arena.alloc(800, 8);
    assert_eq!(arena.chunk_count(), 1);
    arena.alloc(800, 8);
    assert_eq!(arena.chunk_count(), 2);
    assert_eq!(arena.chunk_capacities().collect::<Vec<_>>(), vec![1000, 2000]);
    assert_eq!(arena.total_capacity(), 3000);
}

#[test]
fn test_can_alloc_predicts_growth() {
    let mut arena = ChunkedArena::with_initial_size(256);
    for size in [24, 100, 7, 64, 200, 3] {
        let fits = arena.can_alloc(size, 8);
        let chunks = arena.chunk_count();
        arena.alloc(size, 8);
        assert_eq!(fits, arena.chunk_count() == chunks, "size {size}");
    }
}

#[test]
fn test_alignment() {
    let mut basic = BasicArena::new();
    let mut chunked = ChunkedArena::with_initial_size(512);
    for align in [1, 2, 4, 8, 16, 32, 64] {
        chunked.alloc(3, 1);
        let p = chunked.alloc(5, align);
        assert_eq!(p.as_ptr() as usize % align, 0);
        let q = basic.alloc(5, align);
        assert_eq!(q.as_ptr() as usize % align, 0);
    }
}
