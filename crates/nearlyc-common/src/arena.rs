//! Bulk-lifetime memory arenas.
//! 批量生命周期的内存分配区（Arena）。
//!
//! An arena owns a heterogeneous collection of objects and destroys all of
//! them at once when it is dropped. Each object created with
//! [`Arena::create`] is registered together with a type-erased destructor;
//! at teardown the destructors run exactly once, in creation order, and
//! only afterwards is the raw memory released.
//!
//! Two implementations are provided:
//! - [`BasicArena`] asks the global allocator for every object.
//! - [`ChunkedArena`] bump-allocates out of large chunks whose total
//!   capacity doubles whenever it runs out of space.

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use tracing::{debug, trace};

/// Size of the first chunk of a [`ChunkedArena`] (64 KiB).
pub const DEFAULT_INITIAL_SIZE: usize = 64 * 1024;

/// Alignment of every chunk buffer.
const CHUNK_ALIGN: usize = 16;

/// Registration record for one arena object: where it lives and how to
/// run its destructor without knowing its type.
pub struct ArenaObject {
    obj: NonNull<u8>,
    drop_fn: unsafe fn(*mut u8),
}

impl ArenaObject {
    fn new<T>(obj: NonNull<T>) -> Self {
        ArenaObject {
            obj: obj.cast(),
            drop_fn: drop_object::<T>,
        }
    }

    /// Run the object's destructor. Does not free its memory.
    ///
    /// # Safety
    /// Must be called at most once, while the object's memory is still live.
    unsafe fn on_destroy(&self) {
        unsafe { (self.drop_fn)(self.obj.as_ptr()) }
    }
}

unsafe fn drop_object<T>(obj: *mut u8) {
    unsafe { ptr::drop_in_place(obj.cast::<T>()) }
}

/// An allocator granting bulk, simultaneous destruction of everything
/// created within it.
///
/// Objects obtained from an arena must never be freed individually; they
/// are destroyed when the arena is dropped.
pub trait Arena {
    /// Allocate `size` bytes aligned to `align`, which must be a power of
    /// two. The memory stays valid until the arena is dropped.
    fn alloc(&mut self, size: usize, align: usize) -> NonNull<u8>;

    /// Register an object whose destructor runs at teardown.
    fn add_obj(&mut self, aobj: ArenaObject);

    /// Number of objects registered so far.
    fn object_count(&self) -> usize;

    /// Move `value` into the arena and return a reference to it. The
    /// object's destructor runs when the arena is dropped.
    fn create<T: 'static>(&mut self, value: T) -> &mut T
    where
        Self: Sized,
    {
        let buf = self.alloc(size_of::<T>(), align_of::<T>()).cast::<T>();
        // SAFETY: `buf` is freshly allocated, sized and aligned for `T`,
        // and nothing else refers to it yet.
        unsafe { buf.as_ptr().write(value) };
        self.add_obj(ArenaObject::new(buf));
        // SAFETY: initialised above; the memory lives as long as the arena
        // and the returned borrow is tied to `self`.
        unsafe { &mut *buf.as_ptr() }
    }
}

fn check_align(align: usize) {
    assert!(
        align.is_power_of_two(),
        "arena alignment must be a power of two, got {align}"
    );
}

fn dangling(align: usize) -> NonNull<u8> {
    // SAFETY: `align` is a nonzero power of two, so the address is non-null.
    unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(align)) }
}

fn layout_for(size: usize, align: usize) -> Layout {
    match Layout::from_size_align(size, align) {
        Ok(layout) => layout,
        Err(_) => too_large(size, align),
    }
}

fn too_large(size: usize, align: usize) -> ! {
    panic!("arena allocation of {size} bytes (align {align}) is too large")
}

/// Run every registered destructor once, in registration order.
fn destroy_all(objects: &[ArenaObject]) {
    trace!(objects = objects.len(), "destroying arena objects");
    for aobj in objects {
        // SAFETY: each object is registered exactly once and its memory
        // is released only after this loop completes.
        unsafe { aobj.on_destroy() };
    }
}

// ============================================================================
// BasicArena
// ============================================================================

/// Arena that delegates every allocation to the global allocator.
/// 每次分配都交给全局分配器的 Arena。
#[derive(Default)]
pub struct BasicArena {
    objects: Vec<ArenaObject>,
    blocks: Vec<(NonNull<u8>, Layout)>,
}

impl BasicArena {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Arena for BasicArena {
    fn alloc(&mut self, size: usize, align: usize) -> NonNull<u8> {
        check_align(align);
        if size == 0 {
            return dangling(align);
        }

        let layout = layout_for(size, align);
        // SAFETY: `layout` has nonzero size.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(block) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };
        self.blocks.push((block, layout));
        block
    }

    fn add_obj(&mut self, aobj: ArenaObject) {
        self.objects.push(aobj);
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Drop for BasicArena {
    fn drop(&mut self) {
        destroy_all(&self.objects);
        for (block, layout) in self.blocks.drain(..) {
            // SAFETY: allocated in `alloc` with exactly this layout.
            unsafe { alloc::dealloc(block.as_ptr(), layout) };
        }
    }
}

// ============================================================================
// ChunkedArena
// ============================================================================

/// A contiguous buffer that objects are bump-allocated from.
struct Chunk {
    buf: NonNull<u8>,
    capacity: usize,
    used: usize,
}

impl Chunk {
    fn new(capacity: usize) -> Self {
        let layout = layout_for(capacity.max(1), CHUNK_ALIGN);
        // SAFETY: `layout` has nonzero size.
        let raw = unsafe { alloc::alloc(layout) };
        let Some(buf) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };
        Chunk {
            buf,
            capacity,
            used: 0,
        }
    }

    /// Offset of the next address aligned to `align`. The buffer itself is
    /// aligned to `CHUNK_ALIGN`, so for smaller alignments this is the
    /// `used` counter rounded up to a multiple of `align`.
    fn start_offset(&self, align: usize) -> usize {
        let base = self.buf.as_ptr() as usize;
        (base + self.used).next_multiple_of(align) - base
    }

    fn can_alloc(&self, size: usize, align: usize) -> bool {
        self.start_offset(align)
            .checked_add(size)
            .is_some_and(|end| end <= self.capacity)
    }

    fn alloc(&mut self, size: usize, align: usize) -> NonNull<u8> {
        assert!(self.can_alloc(size, align), "arena chunk overrun");
        let start = self.start_offset(align);
        self.used = start + size;
        // SAFETY: `start + size <= capacity`, so the pointer stays within
        // (or one past the end of) the buffer.
        unsafe { NonNull::new_unchecked(self.buf.as_ptr().add(start)) }
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        let layout = layout_for(self.capacity.max(1), CHUNK_ALIGN);
        // SAFETY: allocated in `Chunk::new` with exactly this layout.
        unsafe { alloc::dealloc(self.buf.as_ptr(), layout) };
    }
}

/// Arena that bump-allocates objects out of large chunks.
/// 从大块内存中顺序分配对象的 Arena。
///
/// When the current chunk cannot satisfy a request, a new chunk twice as
/// large as all chunks allocated so far becomes current. With the default
/// initial size chunks are 64 KiB, 128 KiB, 384 KiB, and so on.
pub struct ChunkedArena {
    total_size: usize,
    chunks: Vec<Chunk>,
    objects: Vec<ArenaObject>,
}

impl ChunkedArena {
    pub fn new() -> Self {
        Self::with_initial_size(DEFAULT_INITIAL_SIZE)
    }

    pub fn with_initial_size(initial_size: usize) -> Self {
        ChunkedArena {
            total_size: initial_size,
            chunks: vec![Chunk::new(initial_size)],
            objects: Vec::new(),
        }
    }

    /// Returns true if an allocation of `size` bytes aligned to `align`
    /// fits in the current chunk without growing the arena.
    pub fn can_alloc(&self, size: usize, align: usize) -> bool {
        check_align(align);
        self.current().can_alloc(size, align)
    }

    /// Number of chunks allocated so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Sum of the capacities of all chunks.
    pub fn total_capacity(&self) -> usize {
        self.total_size
    }

    /// Capacity of each chunk, in allocation order.
    pub fn chunk_capacities(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.iter().map(|c| c.capacity)
    }

    fn current(&self) -> &Chunk {
        match self.chunks.last() {
            Some(chunk) => chunk,
            None => unreachable!("chunked arena always has a chunk"),
        }
    }

    fn grow(&mut self, size: usize, align: usize) {
        let Some(needed) = size.checked_add(align) else {
            too_large(size, align);
        };
        let capacity = self.total_size.saturating_mul(2).max(needed);
        debug!(
            capacity,
            total = self.total_size + capacity,
            "chunked arena: allocating new chunk"
        );
        self.chunks.push(Chunk::new(capacity));
        self.total_size += capacity;
    }
}

impl Default for ChunkedArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena for ChunkedArena {
    fn alloc(&mut self, size: usize, align: usize) -> NonNull<u8> {
        check_align(align);
        if !self.current().can_alloc(size, align) {
            self.grow(size, align);
        }
        match self.chunks.last_mut() {
            Some(chunk) => chunk.alloc(size, align),
            None => unreachable!("chunked arena always has a chunk"),
        }
    }

    fn add_obj(&mut self, aobj: ArenaObject) {
        self.objects.push(aobj);
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Drop for ChunkedArena {
    fn drop(&mut self) {
        // Chunks are released when the fields drop, after every destructor ran.
        destroy_all(&self.objects);
    }
}

// ============================================================================
// AnyArena
// ============================================================================

/// An arena whose implementation is chosen at run time.
pub enum AnyArena {
    Basic(BasicArena),
    Chunked(ChunkedArena),
}

impl Arena for AnyArena {
    fn alloc(&mut self, size: usize, align: usize) -> NonNull<u8> {
        match self {
            AnyArena::Basic(arena) => arena.alloc(size, align),
            AnyArena::Chunked(arena) => arena.alloc(size, align),
        }
    }

    fn add_obj(&mut self, aobj: ArenaObject) {
        match self {
            AnyArena::Basic(arena) => arena.add_obj(aobj),
            AnyArena::Chunked(arena) => arena.add_obj(aobj),
        }
    }

    fn object_count(&self) -> usize {
        match self {
            AnyArena::Basic(arena) => arena.object_count(),
            AnyArena::Chunked(arena) => arena.object_count(),
        }
    }
}

impl From<BasicArena> for AnyArena {
    fn from(arena: BasicArena) -> Self {
        AnyArena::Basic(arena)
    }
}

impl From<ChunkedArena> for AnyArena {
    fn from(arena: ChunkedArena) -> Self {
        AnyArena::Chunked(arena)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tracked {
        id: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.id);
        }
    }

    fn create_tracked(arena: &mut impl Arena, n: usize) -> Rc<RefCell<Vec<usize>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for id in 0..n {
            let tracked = arena.create(Tracked {
                id,
                log: Rc::clone(&log),
            });
            assert_eq!(tracked.id, id);
        }
        log
    }

    #[test]
    fn test_basic_destroys_in_creation_order() {
        let mut arena = BasicArena::new();
        let log = create_tracked(&mut arena, 10);
        assert_eq!(arena.object_count(), 10);
        assert!(log.borrow().is_empty());
        drop(arena);
        assert_eq!(*log.borrow(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_chunked_destroys_in_creation_order() {
        let mut arena = ChunkedArena::with_initial_size(64);
        let log = create_tracked(&mut arena, 100);
        assert!(arena.chunk_count() > 1);
        drop(arena);
        assert_eq!(*log.borrow(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_create_returns_usable_reference() {
        let mut arena = ChunkedArena::new();
        let s = arena.create(String::from("hello"));
        s.push_str(", world");
        assert_eq!(s, "hello, world");
    }

    #[test]
    fn test_chunk_growth_doubles_total() {
        let mut arena = ChunkedArena::with_initial_size(128);
        arena.alloc(100, 1);
        assert_eq!(arena.chunk_count(), 1);
        arena.alloc(100, 1);
        assert_eq!(arena.chunk_count(), 2);
        assert_eq!(arena.chunk_capacities().collect::<Vec<_>>(), vec![128, 256]);
        assert_eq!(arena.total_capacity(), 384);
    }

    #[test]
    fn test_oversized_request_grows_enough() {
        let mut arena = ChunkedArena::with_initial_size(16);
        let p = arena.alloc(1000, 8);
        assert_eq!(p.as_ptr() as usize % 8, 0);
        assert!(arena.chunk_capacities().last().unwrap() >= 1000);
    }

    #[test]
    fn test_can_alloc_agrees_with_alloc() {
        let mut arena = ChunkedArena::with_initial_size(256);
        for (size, align) in [(24, 8), (3, 1), (40, 16), (100, 4), (90, 32), (7, 2)] {
            let fits = arena.can_alloc(size, align);
            let chunks = arena.chunk_count();
            arena.alloc(size, align);
            assert_eq!(fits, arena.chunk_count() == chunks, "size {size} align {align}");
        }
    }

    #[test]
    fn test_alignment() {
        let mut chunked = ChunkedArena::with_initial_size(512);
        let mut basic = BasicArena::new();
        for align in [1, 2, 4, 8, 16, 32, 64, 128] {
            for size in [0, 1, 3, 17] {
                assert_eq!(chunked.alloc(size, align).as_ptr() as usize % align, 0);
                assert_eq!(basic.alloc(size, align).as_ptr() as usize % align, 0);
            }
        }
    }

    #[test]
    #[should_panic(expected = "too large")]
    fn test_huge_chunked_request_panics() {
        let mut arena = ChunkedArena::with_initial_size(64);
        arena.alloc(usize::MAX - 3, 8);
    }

    #[test]
    #[should_panic(expected = "too large")]
    fn test_huge_chunked_request_without_overflow_panics() {
        let mut arena = ChunkedArena::with_initial_size(64);
        arena.alloc(isize::MAX as usize, 8);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_bad_alignment_panics() {
        let mut arena = ChunkedArena::new();
        arena.alloc(8, 3);
    }

    #[test]
    fn test_any_arena_delegates() {
        for mut arena in [
            AnyArena::from(BasicArena::new()),
            AnyArena::from(ChunkedArena::new()),
        ] {
            let log = create_tracked(&mut arena, 3);
            assert_eq!(arena.object_count(), 3);
            drop(arena);
            assert_eq!(*log.borrow(), vec![0, 1, 2]);
        }
    }
}
